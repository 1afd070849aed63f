use crate::error::{IdentityError, Result};

/// A validated deployment owner.
///
/// The user token is the e-mail local part reduced to ASCII alphanumerics.
/// It is the only part of the identity that flows into resource names, so
/// `create`, `update` and `delete` all derive the same names from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    email: String,
    token: String,
}

impl UserIdentity {
    /// Validates `email` against the company domain and derives the user token.
    ///
    /// A company domain without a dot is treated as `<value>.com`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the address is not `local@domain.tld`, the
    /// domain differs from the company domain, or the local part contains no
    /// alphanumeric characters.
    pub fn parse(email: &str, company_domain: &str) -> Result<Self> {
        let email = email.trim();
        let malformed = || IdentityError::MalformedEmail {
            email: email.to_string(),
        };

        let (local, domain) = email.split_once('@').ok_or_else(malformed)?;
        if local.is_empty() || domain.contains('@') || local.chars().any(char::is_whitespace) {
            return Err(malformed());
        }
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
            return Err(malformed());
        }

        let expected = normalize_company_domain(company_domain);
        if !domain.eq_ignore_ascii_case(&expected) {
            return Err(IdentityError::ForeignDomain {
                email: email.to_string(),
                expected,
            });
        }

        let token: String = local.chars().filter(char::is_ascii_alphanumeric).collect();
        if token.is_empty() {
            return Err(IdentityError::EmptyUserToken {
                email: email.to_string(),
            });
        }

        Ok(Self {
            email: email.to_string(),
            token,
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

fn normalize_company_domain(company_domain: &str) -> String {
    let domain = company_domain.trim().trim_start_matches('@');
    if domain.contains('.') {
        domain.to_ascii_lowercase()
    } else {
        format!("{}.com", domain.to_ascii_lowercase())
    }
}
