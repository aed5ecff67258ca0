use compact_str::CompactString;

use termcolor::{Color, ColorSpec};

use vela_mem::DynArray;

use crate::Result;

/// Layout of a single log line as a sequence of text and message segments.
#[derive(Default)]
pub struct LogFmt {
    segments: DynArray<SegmentSpec>,
}

impl LogFmt {

    /// `[label] message`, with the label drawn in `color`.
    pub fn leveled(label: &str, color: Color) -> Self {
        let mut fmt = Self::default();
        let mut builder = LogFmtBuilder::new(&mut fmt);
        builder
            .text("[", |spec| spec)
            .text(label, |spec| spec.with_color_spec(|c| { c.set_fg(Some(color)).set_bold(true); }))
            .text("] ", |spec| spec)
            .message(|spec| spec);
        fmt
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn clear(&mut self) {
        self.segments.clear();
    }

    fn push(&mut self, segment: SegmentSpec) {
        if let Err(err) = self.try_push(segment) {
            panic!("failed to grow log format: {}", err)
        }
    }

    fn try_push(&mut self, segment: SegmentSpec) -> Result<()> {
        self.segments.push_back(segment)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LogFmt {

    type Item = &'a SegmentSpec;
    type IntoIter = vela_mem::Iter<'a, SegmentSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[derive(Default, Clone, Debug)]
pub struct LogSpec {
    pub color_spec: Option<ColorSpec>,
}

impl LogSpec {

    #[inline(always)]
    pub fn with_color_spec(mut self, mut f: impl FnMut(&mut ColorSpec)) -> Self {
        let color_spec = self.color_spec.insert(ColorSpec::new());
        f(color_spec);
        self
    }
}

#[derive(Debug)]
pub enum SegmentSpec {
    Message(LogSpec),
    Text(CompactString, LogSpec),
}

/// Rebuilds a [`LogFmt`] from scratch; existing segments are discarded.
pub struct LogFmtBuilder<'a> {
    fmt: &'a mut LogFmt,
}

impl<'a> LogFmtBuilder<'a> {

    #[inline(always)]
    pub fn new(fmt: &'a mut LogFmt) -> Self {
        fmt.clear();
        Self {
            fmt,
        }
    }

    #[inline(always)]
    pub fn message(&mut self, mut f: impl FnMut(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.push(SegmentSpec::Message(f(Default::default())));
        self
    }

    #[inline(always)]
    pub fn text(&mut self, text: &str, mut f: impl FnMut(LogSpec) -> LogSpec) -> &mut Self {
        self.fmt.push(SegmentSpec::Text(CompactString::new(text), f(Default::default())));
        self
    }
}
