//! E2E tests for the decode pipeline (samples → frames → report text)
//!
//! Waveforms are synthesized at the sample level, packed into the
//! stream layout, run through the full decoder, and the rendered
//! report is compared against the expected text.

use std::io::Cursor;

use somfy_rts_rs::decoder::{run_stream, FilterMode, RtsDecoder, RtsFrame};
use somfy_rts_rs::reporter::{ReportMode, Reporter};
use somfy_rts_rs::resolver::RemoteTable;

/// Sample-level waveform builder, merging runs of equal level.
struct Waveform {
    samples: Vec<u8>,
}

impl Waveform {
    fn new() -> Self {
        let mut w = Self { samples: Vec::new() };
        w.run(0, 40);
        w
    }

    fn run(&mut self, level: u8, length: u64) -> &mut Self {
        for _ in 0..length {
            self.samples.push(level);
        }
        self
    }

    /// Hardware sync pairs, software sync, then the 56 data symbols.
    fn frame(&mut self, raw: u64) -> &mut Self {
        for _ in 0..7 {
            self.run(1, 68).run(0, 68);
        }
        self.run(1, 130).run(0, 17);
        for i in (0..56).rev() {
            let bit = ((raw >> i) & 1) as u8;
            self.run(bit ^ 1, 17).run(bit, 17);
        }
        self
    }

    /// Inter-frame silence long enough to flush
    fn gap(&mut self) -> &mut Self {
        self.run(0, 300)
    }

    /// Pack MSB first; trailing pad bits stay low
    fn packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.samples.len() / 8 + 1);
        let mut acc = 0u8;
        let mut count = 0u8;
        for &s in &self.samples {
            acc = (acc << 1) | (s & 1);
            count += 1;
            if count == 8 {
                out.push(acc);
                acc = 0;
                count = 0;
            }
        }
        if count > 0 {
            out.push(acc << (8 - count));
        }
        out
    }
}

/// A plaintext frame whose checksum folds to zero
fn valid_plaintext(key: u8, control: u8, rolling: u16, address: u32) -> u64 {
    let addr = u64::from(address);
    let wire_addr = ((addr & 0xff) << 16) | (addr & 0xff00) | ((addr >> 16) & 0xff);
    let mut plain = (u64::from(key) << 48)
        | (u64::from(control & 0xf) << 44)
        | (u64::from(rolling) << 24)
        | wire_addr;
    let residue = (0..14).fold(0u64, |acc, i| acc ^ ((plain >> (4 * i)) & 0xf));
    plain | (residue << 40)
}

/// On-air obfuscation (byte-chained XOR, key byte passes through)
fn obfuscate(plain: u64) -> u64 {
    let mut cipher = plain & 0x00ff_0000_0000_0000;
    for i in (0..6).rev() {
        let plain_byte = (plain >> (8 * i)) & 0xff;
        let upper_cipher = (cipher >> (8 * (i + 1))) & 0xff;
        cipher |= (plain_byte ^ upper_cipher) << (8 * i);
    }
    cipher
}

/// Run a packed stream through decoder and reporter, returning the text
fn render_stream(
    packed: Vec<u8>,
    decoder: &mut RtsDecoder,
    table: &RemoteTable,
    mode: ReportMode,
    show_names: bool,
    verbosity: u8,
) -> String {
    let mut reporter = Reporter::new(Vec::new(), mode, show_names, verbosity);
    run_stream(Cursor::new(packed), decoder, |event| {
        reporter.handle(event, table)?;
        Ok(())
    })
    .expect("decode stream");
    String::from_utf8(reporter.into_inner()).expect("report is UTF-8")
}

fn separator() -> String {
    "-".repeat(80)
}

#[test]
fn test_pipeline_reports_resolved_frame() {
    let plain = valid_plaintext(0xa7, 0x2, 0x0d2f, 0x1a2b3c);
    let mut wave = Waveform::new();
    wave.frame(obfuscate(plain)).gap();

    let table = RemoteTable::parse("1a2b3c Living room\n");
    let mut decoder = RtsDecoder::with_defaults();
    let out = render_stream(
        wave.packed(),
        &mut decoder,
        &table,
        ReportMode::MultiLine,
        true,
        0,
    );

    let expected = format!(
        "{:014x}:\n\
         checksum = OK\n\
         Encryption Key = a7\n\
         Control=02 (UP), Rolling Code = 0d2f\n\
         Address = 1a2b3c (Living room)\n\
         {}\n",
        plain,
        separator()
    );
    assert_eq!(out, expected);
}

#[test]
fn test_unknown_address_prints_bare_number() {
    let plain = valid_plaintext(0x42, 0x8, 0x0001, 0x000000);
    let mut wave = Waveform::new();
    wave.frame(obfuscate(plain)).gap();

    let table = RemoteTable::parse("1a2b3c Test Remote\n");
    let mut decoder = RtsDecoder::with_defaults();
    let out = render_stream(
        wave.packed(),
        &mut decoder,
        &table,
        ReportMode::MultiLine,
        true,
        0,
    );

    assert!(out.contains("Control=08 (PROG), "));
    assert!(out.contains("Address = 000000\n"));
    assert!(!out.contains("Test Remote"));
}

#[test]
fn test_one_line_report() {
    let plain = valid_plaintext(0xa7, 0x4, 0x0d30, 0x1a2b3c);
    let mut wave = Waveform::new();
    wave.frame(obfuscate(plain)).gap();

    let table = RemoteTable::parse("1a2b3c Living room\n");
    let mut decoder = RtsDecoder::with_defaults();
    let out = render_stream(
        wave.packed(),
        &mut decoder,
        &table,
        ReportMode::OneLine,
        true,
        0,
    );

    let expected = format!(
        "{:014x}: checksum=OK, Encryption Key=a7, Control=04(DOWN), \
         Rolling Code=0d30, Address=1a2b3c(Living room)\n",
        plain
    );
    assert_eq!(out, expected);
}

#[test]
fn test_numeric_mode_suppresses_annotations() {
    let plain = valid_plaintext(0xa7, 0x2, 0x0d2f, 0x1a2b3c);
    let mut wave = Waveform::new();
    wave.frame(obfuscate(plain)).gap();

    let table = RemoteTable::parse("1a2b3c Living room\n");
    let mut decoder = RtsDecoder::with_defaults();
    let out = render_stream(
        wave.packed(),
        &mut decoder,
        &table,
        ReportMode::MultiLine,
        false,
        0,
    );

    assert!(out.contains("Control=02, Rolling Code = 0d2f\n"));
    assert!(out.contains("Address = 1a2b3c\n"));
    assert!(!out.contains("(UP)"));
    assert!(!out.contains("Living room"));
}

#[test]
fn test_checksum_failure_does_not_stop_decoding() {
    let good = valid_plaintext(0xa7, 0x2, 0x0d2f, 0x1a2b3c);
    let bad_raw = obfuscate(good ^ (0x3 << 28));
    let bad = RtsFrame::from_raw(bad_raw);

    let mut wave = Waveform::new();
    wave.frame(bad_raw).gap().frame(obfuscate(good)).gap();

    let table = RemoteTable::new();
    let mut decoder = RtsDecoder::with_defaults();
    let out = render_stream(
        wave.packed(),
        &mut decoder,
        &table,
        ReportMode::MultiLine,
        true,
        0,
    );

    let expected = format!(
        "{:014x}:\n\
         checksum = FAILED ({:02x})\n\
         {sep}\n\
         {:014x}:\n\
         checksum = OK\n\
         Encryption Key = a7\n\
         Control=02 (UP), Rolling Code = 0d2f\n\
         Address = 1a2b3c\n\
         {sep}\n",
        bad.plaintext(),
        bad.checksum_residue(),
        good,
        sep = separator()
    );
    assert_eq!(out, expected);
}

#[test]
fn test_eof_mid_frame_still_reports() {
    let plain = valid_plaintext(0xc3, 0x1, 0xbeef, 0xabcdef);
    let mut wave = Waveform::new();
    // closing gap too short to flush on its own; end of input must
    wave.frame(obfuscate(plain)).run(0, 60);

    let table = RemoteTable::new();
    let mut decoder = RtsDecoder::with_defaults();
    let out = render_stream(
        wave.packed(),
        &mut decoder,
        &table,
        ReportMode::OneLine,
        true,
        0,
    );

    assert!(out.starts_with(&format!("{:014x}: checksum=OK", plain)));
}

#[test]
fn test_verbose_traces_every_bit() {
    let plain = valid_plaintext(0x5b, 0x2, 0x0002, 0x00c0de);
    let raw = obfuscate(plain);
    let mut wave = Waveform::new();
    wave.frame(raw).gap();

    let table = RemoteTable::new();
    let mut decoder = RtsDecoder::with_defaults();
    let out = render_stream(
        wave.packed(),
        &mut decoder,
        &table,
        ReportMode::OneLine,
        true,
        1,
    );

    // bits stream MSB first in groups of eight, then the report line
    let mut trace = String::from("start: ");
    for i in (0..56).rev() {
        trace.push(if (raw >> i) & 1 == 1 { '1' } else { '0' });
        if (56 - i) % 8 == 0 {
            trace.push(' ');
        }
    }
    trace.push('\n');
    assert!(out.starts_with(&trace));

    let report = format!(
        "{:014x}: checksum=OK, Encryption Key=5b, Control=02(UP), \
         Rolling Code=0002, Address=00c0de\n",
        plain
    );
    assert!(out.ends_with(&report));
}

#[test]
fn test_windowed_filter_pipeline() {
    let plain = valid_plaintext(0x3c, 0x2, 0x1001, 0xc0ffee);
    let mut wave = Waveform::new();
    wave.frame(obfuscate(plain)).gap();

    // flip one sample in the middle of every long run
    let mut samples = wave.samples.clone();
    let mut i = 0;
    while i < samples.len() {
        let level = samples[i];
        let mut j = i;
        while j < samples.len() && samples[j] == level {
            j += 1;
        }
        if j - i >= 30 {
            samples[i + (j - i) / 2] ^= 1;
        }
        i = j;
    }
    let glitched = Waveform { samples }.packed();

    let table = RemoteTable::new();
    let mut decoder = RtsDecoder::new(FilterMode::Windowed);
    let out = render_stream(glitched, &mut decoder, &table, ReportMode::OneLine, true, 0);
    assert!(out.starts_with(&format!("{:014x}: checksum=OK", plain)));
}
