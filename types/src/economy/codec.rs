use bytes::{Buf, BufMut};
use commonware_codec::{Error, ReadExt, Write};

/// Helper to write a collection length as a u32 prefix.
pub fn write_len(len: usize, writer: &mut impl BufMut) {
    (len as u32).write(writer);
}

/// Helper to read a u32 length prefix, rejecting anything above `max_len`.
pub fn read_len(reader: &mut impl Buf, max_len: usize) -> Result<usize, Error> {
    let len = u32::read(reader)? as usize;
    if len > max_len {
        return Err(Error::Invalid("Length", "too long"));
    }
    Ok(len)
}

/// Helper to get encode size of a length prefix.
pub const fn len_encode_size() -> usize {
    4
}
