//! Status helper enums mapping to SMALLSERIAL/SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding `*_statuses` database table.

use portal_core::application::{
    STATUS_ACCEPTED, STATUS_DRAFT, STATUS_REJECTED, STATUS_SUBMITTED, STATUS_WAITLISTED,
};

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Name as seeded in the lookup table.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                $( if name == $label { return Some(Self::$variant); } )+
                None
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Applicant application lifecycle status.
    ApplicationStatus {
        Draft = 1 => STATUS_DRAFT,
        Submitted = 2 => STATUS_SUBMITTED,
        Accepted = 3 => STATUS_ACCEPTED,
        Rejected = 4 => STATUS_REJECTED,
        Waitlisted = 5 => STATUS_WAITLISTED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::application::VALID_STATUSES;

    #[test]
    fn ids_follow_seed_order() {
        for (i, name) in VALID_STATUSES.iter().enumerate() {
            let status = ApplicationStatus::from_name(name).unwrap();
            assert_eq!(status.id(), i as StatusId + 1);
            assert_eq!(status.name(), *name);
            assert_eq!(ApplicationStatus::from_id(status.id()), Some(status));
        }
    }

    #[test]
    fn unknown_values_map_to_none() {
        assert_eq!(ApplicationStatus::from_id(0), None);
        assert_eq!(ApplicationStatus::from_name("pending"), None);
    }
}
