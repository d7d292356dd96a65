use std::io::Cursor;
use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use crate::error::{Error, Result};
use crate::read_from::ReadExt;


/// Size in bytes of a tightly packed `FLOAT` `VEC3` element.
pub const VEC3_SIZE: usize = 3 * 4;


/// Decode `count` three-component `f32` vectors from a buffer view.
///
/// `offset` is the accessor's byte offset into `view`.  When `stride` is given and differs from
/// `VEC3_SIZE`, each vector starts `stride` bytes after the previous one and the bytes in between
/// are skipped.
pub fn read_vec3s(
    view: &[u8],
    offset: usize,
    count: usize,
    stride: Option<usize>,
) -> Result<Vec<[f32; 3]>> {
    let stride = stride.unwrap_or(VEC3_SIZE);
    if stride < VEC3_SIZE {
        return Err(Error::InvalidAccessor(format!(
            "byte stride {} is smaller than a VEC3 element", stride)));
    }
    if count == 0 {
        return Ok(Vec::new());
    }

    let end = (count - 1).checked_mul(stride)
        .zip(offset.checked_add(VEC3_SIZE))
        .and_then(|(x, first_end)| x.checked_add(first_end))
        .filter(|&end| end <= view.len())
        .ok_or_else(|| Error::InvalidAccessor(format!(
            "{} elements at offset {} with stride {} overrun a {}-byte buffer view",
            count, offset, stride, view.len())))?;
    let mut curs = Cursor::new(&view[offset .. end]);

    if stride == VEC3_SIZE {
        return Ok(curs.read_many(count)?);
    }

    let mut v = Vec::with_capacity(count);
    for i in 0 .. count {
        curs.set_position((i * stride) as u64);
        v.push(curs.read_one()?);
    }
    Ok(v)
}


pub fn is_data_uri(uri: &str) -> bool {
    uri.starts_with("data:")
}

/// Decode the payload of a `data:` URI.  The payload follows the first comma; it is base64 when
/// the header says so and raw text otherwise.
pub fn decode_data_uri(uri: &str) -> std::result::Result<Vec<u8>, String> {
    let comma = uri.find(',').ok_or_else(|| "data URI has no payload".to_owned())?;
    let (header, payload) = (&uri[.. comma], &uri[comma + 1 ..]);
    if header.contains("base64") {
        BASE64_STANDARD.decode(payload).map_err(|e| e.to_string())
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}
