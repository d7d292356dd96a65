//! Binary glTF: a 12-byte file header followed by a `JSON` chunk and an
//! optional `BIN\0` chunk, each chunk padded to a multiple of 4 bytes.

use std::io::{self, Read, Cursor};
use crate::error::{Error, Result};
use crate::read_from::{ReadFrom, ReadExt};


const MAGIC: [u8; 4] = *b"glTF";
const CHUNK_JSON: [u8; 4] = *b"JSON";
const CHUNK_BIN: [u8; 4] = *b"BIN\0";
const HEADER_SIZE: usize = 12;
const CHUNK_HEADER_SIZE: usize = 8;


pub struct Glb<'a> {
    pub json: &'a [u8],
    pub bin: Option<&'a [u8]>,
}

pub fn is_glb(data: &[u8]) -> bool {
    data.starts_with(&MAGIC)
}

pub fn split(data: &[u8]) -> Result<Glb<'_>> {
    let h = Cursor::new(data).read_one::<FileHeader>()
        .map_err(|_| Error::Glb("truncated file header".into()))?;
    if h.magic != MAGIC {
        return Err(Error::Glb("missing glTF magic".into()));
    }
    if h.version != 2 {
        return Err(Error::Glb(format!("unsupported version: {}", h.version)));
    }
    let len = h.length as usize;
    if len > data.len() {
        return Err(Error::Glb(format!(
            "header length {} exceeds file size {}", len, data.len())));
    }
    let data = &data[..len];

    let mut pos = HEADER_SIZE;
    let (tag, json) = read_chunk(data, &mut pos)?;
    if tag != CHUNK_JSON {
        return Err(Error::Glb("first chunk is not JSON".into()));
    }

    // Unknown chunk types after the JSON chunk are skipped.
    let mut bin = None;
    while pos < data.len() {
        let (tag, chunk) = read_chunk(data, &mut pos)?;
        if tag == CHUNK_BIN && bin.is_none() {
            bin = Some(chunk);
        }
    }

    Ok(Glb { json, bin })
}

fn read_chunk<'a>(data: &'a [u8], pos: &mut usize) -> Result<([u8; 4], &'a [u8])> {
    let start = *pos + CHUNK_HEADER_SIZE;
    let h = data.get(*pos .. start)
        .map(|b| Cursor::new(b).read_one::<ChunkHeader>())
        .and_then(|r| r.ok())
        .ok_or_else(|| Error::Glb(format!("truncated chunk header at {}", pos)))?;
    let end = start + h.length as usize;
    let chunk = data.get(start .. end)
        .ok_or_else(|| Error::Glb(format!(
            "chunk at {} overruns file: length {}", pos, h.length)))?;
    *pos = end;
    Ok((h.tag, chunk))
}


struct FileHeader {
    magic: [u8; 4],
    version: u32,
    length: u32,
}

impl ReadFrom for FileHeader {
    fn read_from<R: Read + ?Sized>(r: &mut R) -> io::Result<Self> {
        let (magic, version, length) = r.read_one()?;
        Ok(FileHeader { magic, version, length })
    }
}

struct ChunkHeader {
    length: u32,
    tag: [u8; 4],
}

impl ReadFrom for ChunkHeader {
    fn read_from<R: Read + ?Sized>(r: &mut R) -> io::Result<Self> {
        let (length, tag) = r.read_one()?;
        Ok(ChunkHeader { length, tag })
    }
}
