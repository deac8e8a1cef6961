use serde::{de::DeserializeOwned, Serialize};

pub(crate) mod rakuten;
pub(crate) mod sheets;

pub(crate) trait Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
    fn post_json<B>(&self, url: &str, bearer: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let resp = self
            .get(url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(Error::new(ErrorKind::Status, status.to_string()));
        }

        resp.json()
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }

    fn post_json<B>(&self, url: &str, bearer: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize,
    {
        let resp = self
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::Status, status.to_string()))
        }
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_url, impl_text_producer, requests, MockClient, NetworkErrorProducer, Producer,
};

use crate::{Error, ErrorKind};

#[cfg(test)]
mod test {

    use super::*;

    /// A request seen by the [`MockClient`], `body` is only set for posts.
    #[derive(Clone, Debug)]
    pub(crate) struct Request {
        pub(crate) url: String,
        pub(crate) body: Option<String>,
    }

    thread_local! {
        pub(crate) static REQUEST_LOG: std::cell::RefCell<Vec<Request>> = std::cell::RefCell::new(Vec::new());
    }

    /// Every request the [`MockClient`] received on this thread, oldest first.
    pub(crate) fn requests() -> Vec<Request> {
        REQUEST_LOG.with(|log| log.borrow().clone())
    }

    /// Asserts that the expected URL is the same as the last one provided to the [`MockClient`].
    ///
    /// The [`MockClient`] will push every request to the thread local `REQUEST_LOG`, this allows
    /// for asserting that implementing functions or methods are building the correct URL.
    ///
    /// This macro provides a shortcut alternative to the following:
    ///
    /// ```ignore
    /// // .. test code including `MockClient`
    ///
    /// let url = crate::api::requests().pop().map(|r| r.url).unwrap_or_default();
    /// assert_eq!("expected url here", url);
    /// ```
    macro_rules! assert_url {
        ($expected: expr) => {
            assert_url!($expected, "");
        };
        ($expected: expr, $($arg: tt)+) => {
            let url = crate::api::requests().pop().map(|r| r.url).unwrap_or_default();
            assert_eq!($expected, url, $($arg)+);
        };
    }

    /// Produces the response body for a request to `url`.
    pub(crate) trait Producer<T>
    where
        Self: Default,
    {
        fn produce(url: &str) -> Result<T, Error>;
    }

    #[derive(Default)]
    pub(crate) struct MockClient<P: Producer<String> = EmptyTextProducer> {
        _producer: std::marker::PhantomData<P>,
    }

    impl<P: Producer<String>> Client for MockClient<P> {
        fn get_json<T>(&self, url: &str) -> Result<T, Error>
        where
            T: DeserializeOwned,
        {
            REQUEST_LOG.with(|log| {
                log.borrow_mut().push(Request {
                    url: url.to_owned(),
                    body: None,
                });
            });
            P::produce(url).and_then(|json| {
                serde_json::from_str(&json).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
            })
        }

        fn post_json<B>(&self, url: &str, _bearer: &str, body: &B) -> Result<(), Error>
        where
            B: Serialize,
        {
            let body = serde_json::to_string(body).map_err(|e| Error::wrap(ErrorKind::IO, e))?;
            REQUEST_LOG.with(|log| {
                log.borrow_mut().push(Request {
                    url: url.to_owned(),
                    body: Some(body),
                });
            });
            P::produce(url).map(|_| ())
        }
    }

    macro_rules! impl_text_producer {
        ($($producer:ident($url:ident) => $exp:expr,)*) => {
            $(
                #[derive(Default)]
                pub(crate) struct $producer;

                impl crate::api::Producer<String> for $producer {
                    #[allow(unused_variables)]
                    fn produce($url: &str) -> Result<String, crate::Error> {
                        $exp
                    }
                }
            )*
        };
    }
    impl_text_producer! {
        EmptyTextProducer(url) => Ok("".to_owned()),
        NetworkErrorProducer(url) => Err(Error::new(ErrorKind::IO, "Network error")),
    }

    pub(crate) use assert_url;
    pub(crate) use impl_text_producer;
}
