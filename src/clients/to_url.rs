use crate::Error;
use url::Url;

/// A trait for objects which can be converted to a base [`Url`]. Heavily
/// inspired by [`ToSocketAddrs`](std::net::ToSocketAddrs).
pub trait ToUrl {
    fn to_url(&self) -> Result<Url, Error>;
}

impl ToUrl for Url {
    fn to_url(&self) -> Result<Url, Error> {
        Ok(self.clone())
    }
}

impl ToUrl for str {
    fn to_url(&self) -> Result<Url, Error> {
        let url: Url = self.parse()?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidArgument(format!(
                "{} can not be used as a base url",
                self
            )));
        }

        Ok(url)
    }
}

impl ToUrl for String {
    fn to_url(&self) -> Result<Url, Error> {
        self.as_str().to_url()
    }
}

impl<T: ToUrl + ?Sized> ToUrl for &T {
    fn to_url(&self) -> Result<Url, Error> {
        (**self).to_url()
    }
}
