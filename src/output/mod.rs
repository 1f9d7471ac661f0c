use crate::adder::AddTrace;
use crate::harness::DemoRun;
use crate::verify::VerifyReport;
use crate::width::Width;
use std::fmt::Write;

/// One `a + b = sum` line per sample.
pub fn render_demo(run: &DemoRun) -> String {
    let mut out = String::new();
    for sample in &run.samples {
        let _ = writeln!(out, "{sample}");
    }
    out
}

/// Step table for a traced addition, with each value also shown in binary at its width.
pub fn render_trace(trace: &AddTrace<i64>) -> String {
    let width = Width::from_bits(trace.bits).unwrap_or(Width::W64);
    let digits = trace.bits as usize;
    let bin = |v: i64| format!("{:0digits$b}", width.mask(v));

    let mut out = String::new();
    let _ = writeln!(out, "{}-bit: {} + {}", trace.bits, trace.a, trace.b);
    let _ = writeln!(out, "  a     {}  {}", bin(trace.a), trace.a);
    let _ = writeln!(out, "  b     {}  {}", bin(trace.b), trace.b);
    for (round, step) in trace.steps.iter().enumerate() {
        let _ = writeln!(out, "round {}", round + 1);
        let _ = writeln!(
            out,
            "  xor   {}  {}",
            bin(step.partial_sum),
            step.partial_sum
        );
        let _ = writeln!(out, "  carry {}  {}", bin(step.carry), step.carry);
    }
    let _ = writeln!(out, "{} + {} = {}", trace.a, trace.b, trace.sum);
    out
}

/// One-line verdict, followed by any reported mismatches.
pub fn render_verify(report: &VerifyReport) -> String {
    let mut out = String::new();
    let verdict = if report.passed() { "PASS" } else { "FAIL" };
    let _ = write!(
        out,
        "{verdict}: {} {}-bit check, {} pairs, {} mismatches, {} ms",
        report.mode, report.width, report.checked, report.mismatch_count, report.elapsed_ms
    );
    if let Some(seed) = report.seed {
        let _ = write!(out, " (seed {seed})");
    }
    out.push('\n');
    for m in &report.mismatches {
        let _ = writeln!(
            out,
            "  {} + {}: expected {}, got {}",
            m.a, m.b, m.expected, m.actual
        );
    }
    let hidden = (report.mismatch_count as usize).saturating_sub(report.mismatches.len());
    if hidden > 0 {
        let _ = writeln!(out, "  ... and {hidden} more");
    }
    out
}
