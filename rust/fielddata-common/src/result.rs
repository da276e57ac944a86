use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Returns `InvalidArgument` from the enclosing function unless `$cond` holds.
///
/// The error names `$name`; its message is the stringified condition, or the
/// formatted message when one is given.
#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $cond:expr) => {
        $crate::result::check_arg($cond, stringify!($name), || stringify!($cond).to_string())?
    };
    ($name:expr, $cond:expr, $($msg:tt)+) => {
        $crate::result::check_arg($cond, stringify!($name), || format!($($msg)+))?
    };
}

/// Returns `InvalidFormat` from the enclosing function unless `$cond` holds.
///
/// Used by decoders for values read from untrusted input.
#[macro_export]
macro_rules! verify_data {
    ($name:expr, $cond:expr) => {
        $crate::result::check_data($cond, stringify!($name), || stringify!($cond).to_string())?
    };
    ($name:expr, $cond:expr, $($msg:tt)+) => {
        $crate::result::check_data($cond, stringify!($name), || format!($($msg)+))?
    };
}

#[inline]
pub fn check_arg(predicate: bool, name: &str, message: impl FnOnce() -> String) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        Err(Error::invalid_arg(name, message()))
    }
}

#[inline]
pub fn check_data(predicate: bool, name: &str, message: impl FnOnce() -> String) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        Err(Error::invalid_format(name, message()))
    }
}
