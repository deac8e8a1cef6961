use std::fmt::Write;

use bookseek::{
    record::ResultRecord,
    session::Field,
    ErrorKind, RowSink, SearchQuery, SearchReport, Session,
};
use eyre::eyre;
use log::trace;

use crate::interact::{user_confirm, user_input, user_select};

pub fn describe_query(query: &SearchQuery, pages: u32) -> String {
    let mut out = format!("Title:  {}\n", query.title());

    let volume = query
        .volume()
        .map_or_else(|| "not specified (all volumes)".to_owned(), str::to_owned);
    writeln!(out, "Volume: {volume}").ok();

    if query.has_price_range() {
        let bound = |p: Option<u32>| p.map_or_else(|| "-".to_owned(), |p| format!("{p}円"));
        writeln!(
            out,
            "Price:  {} to {}",
            bound(query.min_price()),
            bound(query.max_price())
        )
        .ok();
    }

    writeln!(out, "Pages:  up to {pages}\n").ok();
    out
}

pub fn render_results(records: &[ResultRecord]) -> String {
    let mut out = String::new();
    for (i, r) in records.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} | ISBN {} | {} | {} | {}",
            i + 1,
            r.title,
            r.isbn,
            r.sales_date,
            r.price,
            r.publisher
        )
        .ok();
    }
    out
}

pub fn summary(query: &SearchQuery, report: &SearchReport) -> String {
    let mut out = String::new();

    if !report.failures.is_empty() {
        let pages = report
            .failures
            .iter()
            .map(|f| f.page.to_string())
            .collect::<Vec<_>>();
        writeln!(out, "\nPages without a response: {}", pages.join(", ")).ok();
    }

    if report.records.is_empty() {
        out.push_str(
            "\nNo books matched the search conditions.\n\
             Tips:\n  \
             - every word of the title must appear in the book title, e.g. \"ONE PIECE\" needs both \"ONE\" and \"PIECE\"\n  \
             - enter the volume as a number only, e.g. 108\n  \
             - leave the volume out to list every volume",
        );
        return out;
    }

    let scope = query.volume().map_or_else(
        || format!("all books related to '{}'", query.title()),
        |volume| format!("books related to volume {volume} of '{}'", query.title()),
    );
    write!(
        out,
        "\n{} book(s) found, showing {scope} ({} page(s) searched)",
        report.records.len(),
        report.pages_requested
    )
    .ok();
    out
}

pub fn render_settings(settings: &[(&str, bool)], endpoint: &str) -> String {
    let mut out = String::new();
    for (key, set) in settings {
        writeln!(out, "{key}: {}", if *set { "set" } else { "not set" }).ok();
    }
    write!(out, "Catalog endpoint: {endpoint}").ok();
    out
}

pub fn append_interactively<S: RowSink>(session: &mut Session, sink: &S) -> eyre::Result<usize> {
    let mut appended = 0;

    loop {
        let items = session
            .results()
            .iter()
            .map(|r| format!("{} ({}, {})", r.title, r.isbn, r.price))
            .collect::<Vec<_>>();

        let index = user_select("Choose a book to append", &items, session.selected_index())?;
        trace!("Book {index} chosen");
        session.select(index)?;
        session.begin_append()?;
        edit_draft(session)?;

        let added = loop {
            match session.append(sink) {
                Ok(()) => break true,
                Err(err) if err.kind() == ErrorKind::Validation => {
                    println!("{err}");
                    edit_draft(session)?;
                }
                Err(_) => {
                    if let Some(notice) = session.take_notice() {
                        println!("{notice}");
                    }
                    if !user_confirm("Try appending again?")? {
                        session.cancel_append();
                        break false;
                    }
                }
            }
        };

        if let Some(notice) = session.take_notice() {
            println!("{notice}");
        }
        appended += usize::from(added);

        if !user_confirm("Append another book?")? {
            break;
        }
    }

    Ok(appended)
}

fn edit_draft(session: &mut Session) -> eyre::Result<()> {
    let draft = session.draft_mut().ok_or_else(|| {
        eyre!("Internal error: a row should be being edited after choosing a book")
    })?;

    for field in [Field::Title, Field::SearchTitle, Field::Volume] {
        let value = draft.field_mut(field);
        *value = user_input(format!("Enter the {field}"), value)?;
    }

    Ok(())
}
