use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("'{email}' is not a valid e-mail address")]
    MalformedEmail { email: String },

    #[error("'{email}' does not belong to the company domain '{expected}'")]
    ForeignDomain { email: String, expected: String },

    #[error("the local part of '{email}' has no alphanumeric characters")]
    EmptyUserToken { email: String },
}

pub type Result<T> = std::result::Result<T, IdentityError>;
