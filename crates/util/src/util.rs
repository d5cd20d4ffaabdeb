//! Small helpers shared by the keywire crates.

/// Panic in debug builds, log the message with a backtrace in release.
///
/// For table invariants that a test run must catch but that should never
/// take down a program decoding keyboard input.
#[macro_export]
macro_rules! debug_panic {
    ( $($fmt_arg:tt)* ) => {
        if cfg!(debug_assertions) {
            panic!( $($fmt_arg)* );
        } else {
            let backtrace = std::backtrace::Backtrace::capture();
            tracing::error!("{}\n{:?}", format_args!($($fmt_arg)*), backtrace);
        }
    };
}
