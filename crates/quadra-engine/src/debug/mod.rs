//! Programmer-error checks for the render path.
//!
//! Render-path failures (device calls, violated call-order preconditions) are programmer
//! errors, not runtime conditions. Debug builds log the failing context and then panic at
//! the caller's location so a debugger stops on the offending line. Release builds skip
//! the panic; the error is dropped and the renderer carries on.

/// Checks the result of a device operation, yielding the value on success.
///
/// `None` is only ever returned in release builds.
#[track_caller]
#[inline]
pub fn check<T>(result: anyhow::Result<T>, context: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            if cfg!(debug_assertions) {
                let at = std::panic::Location::caller();
                log::error!("{}({}): {context} failed: {err:#}", at.file(), at.line());
                panic!("{context} failed: {err:#}");
            }
            None
        }
    }
}

/// Checks a call-order or state precondition.
#[track_caller]
#[inline]
pub fn invariant(condition: bool, what: &str) {
    if !cfg!(debug_assertions) || condition {
        return;
    }
    let at = std::panic::Location::caller();
    log::error!("{}({}): assertion failed: {what}", at.file(), at.line());
    panic!("assertion failed: {what}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_ok_yields_the_value() {
        assert_eq!(check(Ok(()), "noop"), Some(()));
        assert_eq!(check(anyhow::Ok(42u32), "value"), Some(42));
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn check_err_is_none_in_release() {
        assert_eq!(check::<()>(Err(anyhow::anyhow!("device lost")), "map"), None);
    }

    #[test]
    fn invariant_true_is_silent() {
        invariant(true, "always holds");
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "map sprite buffer failed: device lost")]
    fn check_err_panics_in_debug() {
        check::<()>(Err(anyhow::anyhow!("device lost")), "map sprite buffer");
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "assertion failed: not recording")]
    fn invariant_false_panics_in_debug() {
        invariant(false, "not recording");
    }
}
