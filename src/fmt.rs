use core::fmt::{Debug, Display, Formatter, Result};

use crate::{
    encoding::EStr,
    error::{Error, ErrorKind},
    url::Url,
};

impl Debug for EStr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Debug::fmt(self.as_str(), f)
    }
}

impl Display for EStr {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(self.as_str(), f)
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        Display::fmt(self.as_str(), f)
    }
}

impl Debug for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Url")
            .field("scheme", &self.scheme())
            .field("authority", &self.encoded_authority())
            .field("path", &self.encoded_path())
            .field("query", &self.encoded_query())
            .field("fragment", &self.encoded_fragment())
            .finish()
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("Error")
            .field("index", &self.index)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.kind {
            ErrorKind::InvalidPart => {
                write!(f, "invalid component at index {}", self.index)
            }
            ErrorKind::TooLarge => f.write_str("maximum length exceeded"),
            ErrorKind::AllocFailure => f.write_str("storage allocation failed"),
        }
    }
}
