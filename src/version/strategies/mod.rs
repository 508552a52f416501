//! Discovery strategy implementations

pub mod etag;
pub mod regex;

pub use self::etag::EtagStrategy;
pub use self::regex::RegexStrategy;
