/*!

The one class of precondition this crate checks at a public boundary rather
than asserting on: shape agreement between a polyhedron's matrices and
right-hand sides. Every other precondition violation (an `Interval`
constructed empty, an out-of-range variable index) stays an
`assert!`/`debug_assert!` at the call site; a caller who already went
through these constructors cannot trip those asserts later.

*/

use thiserror::Error;

/// Returned by the fallible constructors on [`crate::polyhedron::AbstractPolyhedron`].
#[derive(Debug, Error, Eq, PartialEq)]
pub enum PolyError {
    #[error("inequality system shape mismatch: A has {a_rows} rows but b has {b_len} entries")]
    InequalityShapeMismatch { a_rows: usize, b_len: usize },

    #[error("equality system shape mismatch: E has {e_rows} rows but q has {q_len} entries")]
    EqualityShapeMismatch { e_rows: usize, q_len: usize },

    #[error("inequality and equality systems disagree on variable count: A has {a_cols} columns, E has {e_cols}")]
    VariableCountMismatch { a_cols: usize, e_cols: usize },
}
