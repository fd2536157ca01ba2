use strum::{AsRefStr, Display, EnumString};

/// The one role label with authorization weight. Any other stored role
/// string is kept verbatim on the record and grants nothing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
}
