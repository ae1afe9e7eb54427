use console::Style;
use eiger2cbf_core::pipeline::config::ConversionConfig;
use eiger2cbf_core::pipeline::ConversionSummary;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    good: Style,
    bad: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            good: Style::new().green(),
            bad: Style::new().red().bold(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn frame_bound(bound: Option<u64>, default: &str) -> String {
    bound.map_or_else(|| default.to_string(), |b| b.to_string())
}

pub fn print_run_header(config: &ConversionConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("EIGER HDF5 to CBF converter"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(27)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Master file"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Prefix"),
        s.value.apply_to(config.output_prefix())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(format!(
            "{} .. {}",
            frame_bound(config.first_frame, "1"),
            frame_bound(config.last_frame.or(config.first_frame), "all")
        ))
    );
    if config.renumber {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Renumbering"),
            s.good.apply_to("by rotation angle")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Renumbering"),
            s.disabled.apply_to("disabled")
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Workers"),
        s.value.apply_to(config.workers)
    );
    println!();
}

pub fn print_run_summary(summary: &ConversionSummary) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Summary"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Requested"),
        s.value.apply_to(format!(
            "{} .. {} ({} reported by detector)",
            summary.range.first, summary.range.last, summary.reported_frames
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Converted"),
        s.good.apply_to(summary.converted.len())
    );

    let renumbered: Vec<_> = summary.renumbered().collect();
    if !renumbered.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Renumbered"),
            s.value.apply_to(renumbered.len())
        );
        for c in renumbered {
            println!(
                "      {} {} {}",
                s.value.apply_to(c.frame),
                s.label.apply_to("\u{2192}"),
                s.path.apply_to(c.path.display())
            );
        }
    }

    if summary.failed.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Failed"),
            s.good.apply_to("none")
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Failed"),
            s.bad.apply_to(summary.failed.len())
        );
        for f in &summary.failed {
            println!(
                "      {} {}",
                s.bad.apply_to(format!("frame {}:", f.frame)),
                f.error
            );
        }
    }
    println!();
}
