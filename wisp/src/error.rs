/// Every way the virtual machine can fail. None of these are recoverable from inside the machine:
/// once `Machine::step` returns one, the driver should stop stepping and either rebuild the
/// machine from a known-good program or restore a prior snapshot.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum VmError {
    #[display("address 0x{address:0>4X} is outside of memory")]
    AddressOutOfRange { address: usize },
    #[display("call stack is full")]
    StackOverflow,
    #[display("call stack is empty")]
    StackUnderflow,
    #[display("unknown opcode 0x{opcode:0>4X}")]
    UnknownOpcode { opcode: u16 },
    #[display("font table must be exactly 80 bytes, found {len}")]
    InvalidFontTableLength { len: usize },
    #[display("snapshot could not be decoded: {_0}")]
    InvalidSnapshot(#[error(not(source))] postcard::Error),
    #[display("snapshot format version {found} is not supported")]
    SnapshotVersion { found: u8 },
}

impl From<postcard::Error> for VmError {
    fn from(err: postcard::Error) -> Self {
        Self::InvalidSnapshot(err)
    }
}
