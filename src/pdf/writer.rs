use std::collections::BTreeMap;

use crate::model::Newline;

const STREAM_BEGIN: &str = "stream";
const STREAM_END: &str = "endstream";

/// Indirect object reference, numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ref(u32);

impl Ref {
    pub fn get(self) -> u32 {
        self.0
    }

    /// `n 0 R` reference syntax.
    pub fn r(self) -> String {
        format!("{} 0 R", self.0)
    }
}

/// Hands out object ids in the order the objects will be written.
#[derive(Debug)]
pub struct RefAllocator {
    next: u32,
}

impl RefAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn alloc(&mut self) -> Ref {
        let r = Ref(self.next);
        self.next += 1;
        r
    }
}

impl Default for RefAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte count between `stream<EOL>` and `endstream` for the given lines.
///
/// Lines equal to exactly `stream` or `endstream` are skipped wherever they
/// appear; every other line counts its length plus the newline.
pub fn stream_length<S: AsRef<str>>(lines: &[S], newline: Newline) -> usize {
    lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|l| *l != STREAM_BEGIN && *l != STREAM_END)
        .map(|l| l.len() + newline.width())
        .sum()
}

/// Wraps stream content in its dictionary, adding the computed `/Length`.
///
/// `dict` holds the dictionary entries without the closing `>>`.
pub fn stream_object(dict: &[String], content: &[String], newline: Newline) -> Vec<String> {
    let length = stream_length(content, newline);
    let mut lines = Vec::with_capacity(dict.len() + content.len() + 3);
    lines.extend(dict.iter().cloned());
    lines.push(format!("/Length {length} >>"));
    lines.push(STREAM_BEGIN.to_string());
    lines.extend(content.iter().cloned());
    lines.push(STREAM_END.to_string());
    lines
}

pub struct DocumentBuilder {
    buf: Vec<u8>,
    offsets: BTreeMap<u32, usize>,
    newline: Newline,
}

impl DocumentBuilder {
    pub fn new(newline: Newline, version: &str) -> Self {
        let mut builder = Self {
            buf: Vec::new(),
            offsets: BTreeMap::new(),
            newline,
        };
        builder.append(format!("%PDF-{version}{}", newline.as_str()).as_bytes());
        builder
    }

    /// Current buffer length, i.e. where the next byte will land.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let offset = self.buf.len();
        self.buf.extend_from_slice(bytes);
        offset
    }

    fn push_line(&mut self, line: &str) {
        self.buf.extend_from_slice(line.as_bytes());
        // The stream keyword must be followed by CRLF or LF, never a bare CR.
        let eol = if line == STREAM_BEGIN && self.newline == Newline::Cr {
            Newline::CrLf
        } else {
            self.newline
        };
        self.buf.extend_from_slice(eol.as_str().as_bytes());
    }

    /// Writes lines that are not part of the object table (trailer etc.),
    /// followed by a blank line.
    pub fn append_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> usize {
        let offset = self.offset();
        for line in lines {
            self.push_line(line.as_ref());
        }
        self.push_line("");
        offset
    }

    /// Writes `id 0 obj ... endobj` and records its offset.
    ///
    /// # Panics
    ///
    /// If `id` is not the next id in sequence. The xref table is positional,
    /// so a gap or reordering would point readers at the wrong bytes.
    pub fn add_object<S: AsRef<str>>(&mut self, id: Ref, lines: &[S]) -> usize {
        let expected = self.offsets.len() as u32 + 1;
        assert_eq!(
            id.get(),
            expected,
            "objects must be written in id order: got {}, expected {expected}",
            id.get()
        );

        let offset = self.offset();
        self.offsets.insert(id.get(), offset);
        self.push_line(&format!("{} 0 obj", id.get()));
        for line in lines {
            self.push_line(line.as_ref());
        }
        self.push_line("endobj");
        self.push_line("");
        log::debug!("Object {} at offset {offset} ({} lines)", id.get(), lines.len());
        offset
    }

    pub fn object_offsets(&self) -> &BTreeMap<u32, usize> {
        &self.offsets
    }

    /// Row count of the xref table, including the free-list head.
    pub fn xref_size(&self) -> usize {
        self.offsets.len() + 1
    }

    /// One 20-byte xref entry. Single-byte newlines get a padding space.
    fn xref_entry(&self, offset: usize, generation: u32, flag: char) -> String {
        let eol = match self.newline {
            Newline::CrLf => "\r\n",
            Newline::Cr => " \r",
            Newline::Lf => " \n",
        };
        format!("{offset:010} {generation:05} {flag}{eol}")
    }

    /// Writes the xref table, trailer and footer, returning the finished file.
    ///
    /// `trailer` holds the trailer dictionary entries between `<<` and `>>`;
    /// `/Size` is prepended here.
    pub fn finish<S: AsRef<str>>(mut self, trailer: &[S]) -> Vec<u8> {
        let size = self.xref_size();
        let start_xref = self.offset();

        self.push_line("xref");
        self.push_line(&format!("0 {size}"));
        let mut rows = String::new();
        rows.push_str(&self.xref_entry(0, 65535, 'f'));
        for &offset in self.offsets.values() {
            rows.push_str(&self.xref_entry(offset, 0, 'n'));
        }
        self.append(rows.as_bytes());
        self.push_line("");
        self.push_line("trailer");

        let mut dict = vec!["<<".to_string(), format!("/Size {size}")];
        dict.extend(trailer.iter().map(|l| l.as_ref().to_string()));
        dict.push(">>".to_string());
        self.append_lines(&dict);

        self.push_line("startxref");
        self.push_line(&start_xref.to_string());
        self.push_line("%%EOF");

        log::debug!("xref at offset {start_xref}, {size} entries");
        self.buf
    }
}
