/// Headroom left on the current stack before recursion moves to a new segment.
const RED_ZONE: usize = 100 * 1024;
/// Size of each heap-allocated segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Runs `f`, switching to a fresh stack segment first when the current one
/// is nearly used up. Every recursive walk over the AST goes through here.
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}
