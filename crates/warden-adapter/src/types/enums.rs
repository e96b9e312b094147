/*
[INPUT]:  Remote host schema definitions and serde requirements
[OUTPUT]: Typed Rust enums encoded as the host's integer codes
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the remote host adds enum values
*/

use serde::{Deserialize, Serialize};

/// Declares an enum that travels on the wire as a small integer.
macro_rules! wire_code_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                match value {
                    $($name::$variant => $code),+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = String;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    other => Err(format!("unknown {} code {other}", stringify!($name))),
                }
            }
        }
    };
}

wire_code_enum! {
    /// Network protocol an outbound rule applies to
    Protocol {
        #[default]
        All = 0,
        Tcp = 1,
        Udp = 2,
        Icmp = 3,
    }
}

wire_code_enum! {
    /// Access mode of a bind mount
    BindMountMode {
        #[default]
        ReadOnly = 0,
        ReadWrite = 1,
    }
}

wire_code_enum! {
    /// Where the source path of a bind mount lives
    BindMountOrigin {
        #[default]
        Host = 0,
        Container = 1,
    }
}

wire_code_enum! {
    /// Which usage a disk limit is measured against
    DiskLimitScope {
        #[default]
        Total = 0,
        Exclusive = 1,
    }
}
