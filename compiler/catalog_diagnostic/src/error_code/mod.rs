//! Stable codes for resolver and catalog diagnostics.
//!
//! The leading digit names the area: `E1` call resolution, `E2` catalog
//! maintenance, `E9` broken internal state.

use std::fmt;

macro_rules! error_codes {
    ($($code:ident => $what:literal,)*) => {
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum ErrorCode {
            $(#[doc = $what] $code,)*
        }

        impl ErrorCode {
            /// Every code, in declaration order.
            pub const ALL: &[ErrorCode] = &[$(ErrorCode::$code,)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(ErrorCode::$code => stringify!($code),)*
                }
            }
        }
    };
}

error_codes! {
    E1001 => "no operator with this name",
    E1002 => "no overload accepts the argument types",
    E1003 => "several overloads fit equally well",
    E2001 => "an overload with this signature already exists",
    E2002 => "unknown operator",
    E2003 => "unknown scalar type",
    E2004 => "unknown conversion",
    E2005 => "unknown library",
    E2006 => "name already defined",
    E2007 => "scalar type still referenced",
    E2008 => "reserved type cannot be changed",
    E9001 => "a catalog id space is exhausted",
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
