/// Declares a closed set of values persisted as `TEXT` columns.
///
/// Rows keep the raw string (the schema is the source of truth); services
/// parse into these enums whenever a value crosses the API boundary or a rule
/// depends on it.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(crate::error::Error::InvalidStatus(format!(
                        "'{}' is not a valid {}",
                        other,
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

pub mod actor;
pub mod application;
pub mod feedback;
pub mod job;
pub mod notification;
pub mod profile;
pub mod user;
