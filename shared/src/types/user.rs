use std::fmt;

/// Identity record owned by the credential store.
///
/// `password` is the stored verifier. The engine only ever sees this type
/// through the store trait and never writes it directly.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub password: String,
    pub role: String,
    pub is_logged_in: bool,
}

// Both impls keep the verifier out of log lines.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("is_logged_in", &self.is_logged_in)
            .finish()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={}, name={}, role={}, logged_in={}",
            self.id, self.name, self.role, self.is_logged_in
        )
    }
}
