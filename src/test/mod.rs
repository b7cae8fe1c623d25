use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::feature::{FeatureError, FeatureRequest, FeatureTable};
use crate::io::output::{OutputKind, OutputOptions, Seqout};
use crate::seq::Seq;
use crate::{SeqoutError, SeqoutResult};

mod session;

fn seqs() -> Vec<Seq> {
    vec![
        Seq::new("seq1", b"ACGTACGTAC").with_desc("test seq"),
        Seq::new("seq2", b"TTGGCAGG"),
    ]
}

fn opts(format: &str) -> OutputOptions {
    OutputOptions::new(OutputKind::Stdout, format).expect_empty()
}

/// Writes all sequences to memory and closes the session
fn write(opts: OutputOptions, seqs: &[Seq]) -> SeqoutResult<Vec<u8>> {
    let mut out = vec![];
    {
        let mut o = Seqout::with_writer(&mut out, opts)?;
        for seq in seqs {
            o.write(seq)?;
        }
        o.close()?;
    }
    Ok(out)
}

fn output(format: &str, seqs: &[Seq]) -> String {
    let out = write(opts(format), seqs).unwrap();
    String::from_utf8(out).unwrap()
}

fn cmp(format: &str, seqs: &[Seq], expected: &str) {
    assert_eq!(output(format, seqs), expected);
}

fn fails(format: &str, seqs: &[Seq], msg: &str) -> SeqoutError {
    match write(opts(format), seqs) {
        Ok(out) => panic!(
            "writing {} succeeded: {}",
            format,
            String::from_utf8_lossy(&out)
        ),
        Err(e) => {
            assert!(
                e.to_string().contains(msg),
                "error message '{}' does not contain '{}'",
                e,
                msg
            );
            e
        }
    }
}

struct TmpDir {
    dir: tempfile::TempDir,
}

impl TmpDir {
    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn read(&self, name: &str) -> Vec<u8> {
        fs::read(self.path(name)).unwrap()
    }

    fn files(&self, sub: &str) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(self.path(sub))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

fn with_tmpdir<F, O>(prefix: &str, func: F) -> O
where
    F: FnOnce(&TmpDir) -> O,
{
    let dir = tempfile::Builder::new().prefix(prefix).tempdir().unwrap();
    let td = TmpDir { dir };
    func(&td)
}

/// Feature table writing one line per request, so that tests can check
/// where it ends up and which range was requested
#[derive(Debug)]
struct TestFeatures;

impl FeatureTable for TestFeatures {
    fn is_empty(&self) -> bool {
        false
    }

    fn write(&self, req: &FeatureRequest, out: &mut dyn io::Write) -> Result<(), FeatureError> {
        writeln!(
            out,
            "FEATURES {} {} {}..{}{}",
            req.format,
            req.seq_name,
            req.begin,
            req.end,
            if req.reversed { " reversed" } else { "" }
        )?;
        Ok(())
    }
}

/// Feature table that always fails
#[derive(Debug)]
struct BrokenFeatures;

impl FeatureTable for BrokenFeatures {
    fn is_empty(&self) -> bool {
        false
    }

    fn write(&self, req: &FeatureRequest, _: &mut dyn io::Write) -> Result<(), FeatureError> {
        Err(FeatureError::UnsupportedFormat(req.format.to_string()))
    }
}

fn with_features(seq: Seq) -> Seq {
    seq.with_features(Arc::new(TestFeatures))
}
