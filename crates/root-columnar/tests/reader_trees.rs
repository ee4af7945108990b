//! Composed reader trees: nested containers, framed objects and shared
//! children, decoded end to end.

use root_columnar::buffer::{BYTE_COUNT_MASK, IS_REFERENCED, NEW_CLASS_TAG};
use root_columnar::readers::{
    DoubleReader, EmptyReader, GroupReader, Int32Reader, ObjectHeaderReader, ObjectReader,
    STLSeqReader, STLStringReader, TObjectReader, TStringReader,
};
use root_columnar::{Column, Output, read_data, shared};

fn fnbytes(n: u32) -> [u8; 4] {
    (BYTE_COUNT_MASK | n).to_be_bytes()
}

#[test]
fn vector_of_vector_of_int32() {
    // one event: [[1, 2], []]
    let mut data = Vec::new();
    data.extend_from_slice(&2u32.to_be_bytes());
    data.extend_from_slice(&2u32.to_be_bytes());
    data.extend_from_slice(&1i32.to_be_bytes());
    data.extend_from_slice(&2i32.to_be_bytes());
    data.extend_from_slice(&0u32.to_be_bytes());
    let offsets = [0u32, data.len() as u32];

    let inner = shared(STLSeqReader::new("inner", false, shared(Int32Reader::new("e"))));
    let outer = shared(STLSeqReader::new("outer", false, inner));
    let out = read_data(&data, &offsets, &outer).unwrap();
    assert_eq!(
        out,
        Output::Jagged {
            offsets: vec![0, 2],
            items: Box::new(Output::Jagged {
                offsets: vec![0, 2, 2],
                items: Box::new(Output::Flat(Column::Int32(vec![1, 2]))),
            }),
        }
    );
}

#[test]
fn vector_of_strings() {
    // one event: ["hi", "", "!"]
    let mut data = Vec::new();
    data.extend_from_slice(&3u32.to_be_bytes());
    data.extend_from_slice(&[2, b'h', b'i']);
    data.extend_from_slice(&[0]);
    data.extend_from_slice(&[1, b'!']);
    let offsets = [0u32, data.len() as u32];

    let reader = shared(STLSeqReader::new(
        "v",
        false,
        shared(STLStringReader::new("s", false)),
    ));
    let out = read_data(&data, &offsets, &reader).unwrap();
    assert_eq!(
        out,
        Output::Jagged {
            offsets: vec![0, 3],
            items: Box::new(Output::Jagged {
                offsets: vec![0, 2, 2, 3],
                items: Box::new(Output::Flat(Column::UInt8(b"hi!".to_vec()))),
            }),
        }
    );
}

#[test]
fn object_with_tobject_base_and_members() {
    // a streamed object: fNBytes/fVersion, TObject base, one name, one value
    let mut members = Vec::new();
    members.extend_from_slice(&1i16.to_be_bytes()); // TObject fVersion
    members.extend_from_slice(&0u32.to_be_bytes()); // fUniqueID
    members.extend_from_slice(&0u32.to_be_bytes()); // fBits
    members.extend_from_slice(&[3, b'p', b'o', b's']);
    members.extend_from_slice(&1.5f64.to_be_bytes());

    let mut data = Vec::new();
    data.extend_from_slice(&fnbytes(2 + members.len() as u32));
    data.extend_from_slice(&2i16.to_be_bytes());
    data.extend_from_slice(&members);
    let offsets = [0u32, data.len() as u32];

    let reader = shared(ObjectReader::new(
        "track",
        vec![
            shared(TObjectReader::new("base", false)),
            shared(TStringReader::new("name")),
            shared(DoubleReader::new("pos")),
        ],
    ));
    let out = read_data(&data, &offsets, &reader).unwrap();
    assert_eq!(
        out,
        Output::Group(vec![
            Output::None,
            Output::Jagged {
                offsets: vec![0, 3],
                items: Box::new(Output::Flat(Column::UInt8(b"pos".to_vec()))),
            },
            Output::Flat(Column::Float64(vec![1.5])),
        ])
    );
}

#[test]
fn tobject_keep_data_through_the_driver() {
    let mut event = Vec::new();
    event.extend_from_slice(&1i16.to_be_bytes());
    event.extend_from_slice(&9i32.to_be_bytes());
    event.extend_from_slice(&IS_REFERENCED.to_be_bytes());
    event.extend_from_slice(&4u16.to_be_bytes());
    let offsets = [0u32, event.len() as u32];

    let reader = shared(TObjectReader::new("obj", true));
    let out = read_data(&event, &offsets, &reader).unwrap();
    assert_eq!(
        out,
        Output::TObject {
            unique_id: vec![9],
            bits: vec![IS_REFERENCED],
            pidf: vec![4],
            pidf_offsets: vec![0, 1],
        }
    );
}

#[test]
fn object_header_wraps_a_polymorphic_member() {
    let mut tail = Vec::new();
    tail.extend_from_slice(&NEW_CLASS_TAG.to_be_bytes());
    tail.extend_from_slice(b"TRef\0");
    tail.extend_from_slice(&11i32.to_be_bytes());
    let mut data = Vec::new();
    data.extend_from_slice(&fnbytes(tail.len() as u32));
    data.extend_from_slice(&tail);
    let offsets = [0u32, data.len() as u32];

    let reader = shared(ObjectHeaderReader::new("ref", shared(Int32Reader::new("id"))));
    let out = read_data(&data, &offsets, &reader).unwrap();
    assert_eq!(out, Output::Flat(Column::Int32(vec![11])));
}

#[test]
fn shared_empty_stub_under_two_parents() {
    // both groups ignore their element via the same stub reader
    let data = [0x00, 0x00, 0x00, 0x07];
    let offsets = [0u32, 4];

    let stub = shared(EmptyReader::new("ignored"));
    let reader = shared(GroupReader::new(
        "g",
        vec![
            shared(GroupReader::new("g1", vec![stub.clone()])),
            shared(Int32Reader::new("x")),
            shared(GroupReader::new("g2", vec![stub])),
        ],
    ));
    let out = read_data(&data, &offsets, &reader).unwrap();
    assert_eq!(
        out,
        Output::Group(vec![
            Output::Group(vec![Output::None]),
            Output::Flat(Column::Int32(vec![7])),
            Output::Group(vec![Output::None]),
        ])
    );
}

#[test]
fn group_decodes_two_branch_members_per_event() {
    // two events, each an i32 then a string
    let mut data = Vec::new();
    let mut offsets = vec![0u32];
    for (v, s) in [(1i32, "a"), (2, "bc")] {
        data.extend_from_slice(&v.to_be_bytes());
        data.push(s.len() as u8);
        data.extend_from_slice(s.as_bytes());
        offsets.push(data.len() as u32);
    }

    let reader = shared(GroupReader::new(
        "event",
        vec![shared(Int32Reader::new("n")), shared(TStringReader::new("tag"))],
    ));
    let out = read_data(&data, &offsets, &reader).unwrap();
    assert_eq!(
        out,
        Output::Group(vec![
            Output::Flat(Column::Int32(vec![1, 2])),
            Output::Jagged {
                offsets: vec![0, 1, 3],
                items: Box::new(Output::Flat(Column::UInt8(b"abc".to_vec()))),
            },
        ])
    );
}
