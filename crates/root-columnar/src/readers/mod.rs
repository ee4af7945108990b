//! The reader catalog: one small deserializer per streamer element kind.
//!
//! An upstream planner composes these into a tree describing one branch's
//! streamer layout; the driver then executes the tree once per event.

pub mod basic;
pub mod composite;
pub mod empty;
pub mod framing;
pub mod stl;
pub mod tarray;
pub mod tobject;
pub mod tstring;

pub use basic::{
    BasicReader, BoolReader, DoubleReader, FloatReader, Int8Reader, Int16Reader, Int32Reader,
    Int64Reader, Scalar, ScalarKind, UInt8Reader, UInt16Reader, UInt32Reader, UInt64Reader,
    primitive_for,
};
pub use composite::{CArrayReader, GroupReader, ObjectReader};
pub use empty::EmptyReader;
pub use framing::{NBytesVersionReader, ObjectHeaderReader};
pub use stl::{STLMapReader, STLSeqReader, STLStringReader};
pub use tarray::{
    TArrayCReader, TArrayDReader, TArrayFReader, TArrayIReader, TArrayLReader, TArrayReader,
    TArraySReader,
};
pub use tobject::TObjectReader;
pub use tstring::TStringReader;
