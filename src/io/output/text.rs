//! Wrapping of free text fields in annotated formats (EMBL `DE`, GenBank
//! `DEFINITION`, ...)

use std::io;

use textwrap::{Options, WordSplitter, WrapAlgorithm};

/// Writes `text` wrapped to lines of at most `width` characters, the first
/// line starting with `first` and the following ones with `rest`.
/// Words longer than a line are not broken. Nothing is written for empty
/// text.
pub fn write_wrapped(
    out: &mut dyn io::Write,
    first: &str,
    rest: &str,
    text: &str,
    width: usize,
) -> io::Result<()> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    let opts = Options::new(width)
        .initial_indent(first)
        .subsequent_indent(rest)
        .break_words(false)
        .word_splitter(WordSplitter::NoHyphenation)
        .wrap_algorithm(WrapAlgorithm::FirstFit);
    for line in textwrap::wrap(text, opts) {
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// Same prefix on every line (EMBL / Swiss-Prot line tags)
pub fn write_tagged(out: &mut dyn io::Write, tag: &str, text: &str, width: usize) -> io::Result<()> {
    write_wrapped(out, tag, tag, text, width)
}

/// Writes a list joined with `sep` and terminated with `end`, wrapped
/// behind `tag` (e.g. `KW   a; b; c.` or `OC   Eukaryota; Metazoa.`)
pub fn write_list(
    out: &mut dyn io::Write,
    tag: &str,
    items: &[String],
    sep: &str,
    end: &str,
    width: usize,
) -> io::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    let mut text = items.join(sep);
    text.push_str(end);
    write_tagged(out, tag, &text, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping() {
        let mut out = vec![];
        let text = "Trifolium repens mRNA for non-cyanogenic beta-glucosidase and some more words";
        write_tagged(&mut out, "DE   ", text, 38).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "DE   Trifolium repens mRNA for\n\
             DE   non-cyanogenic beta-glucosidase\n\
             DE   and some more words\n"
        );
        let mut out = vec![];
        write_wrapped(&mut out, "DEFINITION  ", "            ", "short", 80).unwrap();
        assert_eq!(&out, b"DEFINITION  short\n");
        let mut out = vec![];
        write_tagged(&mut out, "DE   ", "  ", 80).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn list() {
        let mut out = vec![];
        let kw = vec!["beta-glucosidase".to_string(), "cyanogenesis".to_string()];
        write_list(&mut out, "KW   ", &kw, "; ", ".", 80).unwrap();
        assert_eq!(&out, b"KW   beta-glucosidase; cyanogenesis.\n");
    }
}
