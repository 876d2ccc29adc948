use crate::inst::{Addr, Inst};
use crate::reg::Reg;
use crate::WORD;

use color_print::cformat;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_LABEL: AtomicUsize = AtomicUsize::new(0);

/// Allocate a fresh label. Labels are never reused within a process.
pub fn next_label() -> String {
    format!(".L{}", NEXT_LABEL.fetch_add(1, Ordering::Relaxed))
}

/// Quote a string for `.asciiz`. Only `\\`, `"`, newline and tab are
/// escaped; every other character is kept as is.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Text,
    Data,
    Align(u32),
    Globl(String),
    // label: .space bytes
    Space(String, u32),
    // label: .asciiz "text"
    Asciiz(String, String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Text => write!(f, "\t.text"),
            Directive::Data => write!(f, "\t.data"),
            Directive::Align(n) => write!(f, "\t.align {n}"),
            Directive::Globl(name) => write!(f, "\t.globl {name}"),
            Directive::Space(label, bytes) => write!(f, "{label}:\t.space {bytes}"),
            Directive::Asciiz(label, text) => write!(f, "{label}:\t.asciiz {}", quote(text)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Inst(Inst, Option<String>),
    Label(String, Option<String>),
    Directive(Directive),
    Comment(String),
    Blank,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Inst(inst, None) => write!(f, "\t{inst}"),
            Line::Inst(inst, Some(c)) => write!(f, "\t{:<28}# {c}", inst.to_string()),
            Line::Label(name, None) => write!(f, "{name}:"),
            Line::Label(name, Some(c)) => write!(f, "{:<29}# {c}", format!("{name}:")),
            Line::Directive(d) => write!(f, "{d}"),
            Line::Comment(c) => write!(f, "\t# {c}"),
            Line::Blank => Ok(()),
        }
    }
}

impl Line {
    pub fn cformat(&self) -> String {
        match self {
            Line::Inst(inst, None) => format!("    {}", inst.cformat()),
            Line::Inst(inst, Some(c)) => cformat!("    {} <dim># {}</>", inst.cformat(), c),
            Line::Label(name, None) => cformat!("<yellow>{}:</>", name),
            Line::Label(name, Some(c)) => cformat!("<yellow>{}:</> <dim># {}</>", name, c),
            Line::Directive(d) => cformat!("<cyan>{}</>", d),
            Line::Comment(c) => cformat!("    <dim># {}</>", c),
            Line::Blank => String::new(),
        }
    }
}

/// Assembly buffer. Emission only appends; nothing here inspects the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code(Vec<Line>);

impl Code {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line] {
        &self.0
    }

    pub fn inst(&mut self, inst: Inst) {
        self.0.push(Line::Inst(inst, None));
    }

    pub fn inst_with_comment(&mut self, inst: Inst, comment: impl Into<String>) {
        self.0.push(Line::Inst(inst, Some(comment.into())));
    }

    pub fn label(&mut self, name: impl Into<String>) {
        self.0.push(Line::Label(name.into(), None));
    }

    pub fn label_with_comment(&mut self, name: impl Into<String>, comment: impl Into<String>) {
        self.0.push(Line::Label(name.into(), Some(comment.into())));
    }

    pub fn directive(&mut self, directive: Directive) {
        self.0.push(Line::Directive(directive));
    }

    pub fn comment(&mut self, text: impl Into<String>) {
        self.0.push(Line::Comment(text.into()));
    }

    pub fn blank(&mut self) {
        self.0.push(Line::Blank);
    }

    /// `sw reg, 0($sp)` then grow the stack by one word.
    pub fn push(&mut self, reg: Reg) {
        self.inst_with_comment(Inst::SW(reg, Addr::Indexed(0, Reg::SP)), "PUSH");
        self.inst(Inst::SUBUI(Reg::SP, Reg::SP, WORD));
    }

    /// `lw reg, 4($sp)` then shrink the stack by one word.
    pub fn pop(&mut self, reg: Reg) {
        self.inst_with_comment(Inst::LW(reg, Addr::Indexed(WORD, Reg::SP)), "POP");
        self.inst(Inst::ADDUI(Reg::SP, Reg::SP, WORD));
    }

    pub fn cformat(&self) -> String {
        self.0
            .iter()
            .map(Line::cformat)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.0 {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
