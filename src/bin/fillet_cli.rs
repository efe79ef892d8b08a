#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("fillet_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};

    use fillet_engine::geom::{
        Arc2, Chain, Point2, Segment, Tolerance, apply_fillet_with_tolerance, fillet_chain,
    };
    use fillet_engine::snapshot::{
        chain_snapshot, normalize_snapshot_text, write_fillet_chain_diagnostics,
        write_fillet_report,
    };

    const USAGE: &str = r#"fillet_cli (fillet-engine)

USAGE:
  fillet_cli list
  fillet_cli run <scenario|all> [options]

SCENARIOS:
  line_line_right_angle
  line_line_too_large
  arc_line
  line_arc
  arc_arc
  closed_square_all

OPTIONS (run):
  --out-dir <dir>    Write <scenario>.snap to this dir (required for `all`)
  --snap <path>      Write the snapshot to a file (single scenario only)
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut out_dir: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out-dir" => out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if let Some(dir) = out_dir.as_ref() {
            if snap_path.is_some() {
                return Err("use either --out-dir or --snap (not both)".to_string());
            }
            fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

            if scenario_name == "all" {
                for scenario in Scenario::ALL {
                    run_one_scenario_to_dir(*scenario, dir, overwrite)?;
                }
                return Ok(());
            }

            let scenario = Scenario::from_str(&scenario_name)
                .ok_or_else(|| unknown_scenario(&scenario_name))?;
            return run_one_scenario_to_dir(scenario, dir, overwrite);
        }

        if scenario_name == "all" {
            return Err("`run all` requires --out-dir".to_string());
        }

        let scenario =
            Scenario::from_str(&scenario_name).ok_or_else(|| unknown_scenario(&scenario_name))?;
        let output = run_scenario(scenario)?;

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &output.snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", output.snapshot);
        }
        eprintln!("{}: {}", output.name, output.summary);

        Ok(())
    }

    fn run_one_scenario_to_dir(scenario: Scenario, dir: &Path, overwrite: bool) -> Result<(), String> {
        let output = run_scenario(scenario)?;
        let path = dir.join(format!("{}.snap", output.name));
        write_text_file(&path, &output.snapshot, overwrite)?;
        eprintln!("wrote {}", path.display());
        eprintln!("{}: {}", output.name, output.summary);
        Ok(())
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text))
            .map_err(|e| format!("write {}: {e}", path.display()))
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Scenario {
        LineLineRightAngle,
        LineLineTooLarge,
        ArcLine,
        LineArc,
        ArcArc,
        ClosedSquareAll,
    }

    impl Scenario {
        const ALL: &'static [Scenario] = &[
            Scenario::LineLineRightAngle,
            Scenario::LineLineTooLarge,
            Scenario::ArcLine,
            Scenario::LineArc,
            Scenario::ArcArc,
            Scenario::ClosedSquareAll,
        ];

        fn name(self) -> &'static str {
            match self {
                Scenario::LineLineRightAngle => "line_line_right_angle",
                Scenario::LineLineTooLarge => "line_line_too_large",
                Scenario::ArcLine => "arc_line",
                Scenario::LineArc => "line_arc",
                Scenario::ArcArc => "arc_arc",
                Scenario::ClosedSquareAll => "closed_square_all",
            }
        }

        fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }
    }

    struct ScenarioOutput {
        name: &'static str,
        summary: String,
        snapshot: String,
    }

    fn run_scenario(scenario: Scenario) -> Result<ScenarioOutput, String> {
        let tol = Tolerance::default_geom();
        match scenario {
            Scenario::LineLineRightAngle => single_fillet(scenario, &right_angle(), 1, 2.0, tol),
            Scenario::LineLineTooLarge => single_fillet(scenario, &right_angle(), 1, 20.0, tol),
            Scenario::ArcLine => {
                let chain = Chain::from_segments(
                    &[
                        Segment::Arc(Arc2::new(Point2::ORIGIN, 5.0, 0.0, FRAC_PI_2)),
                        Segment::line(Point2::new(0.0, 5.0), Point2::new(10.0, 5.0)),
                    ],
                    false,
                    tol,
                )
                .map_err(|e| e.to_string())?;
                single_fillet(scenario, &chain, 1, 1.0, tol)
            }
            Scenario::LineArc => {
                let chain = Chain::from_segments(
                    &[
                        Segment::line(Point2::new(-10.0, 5.0), Point2::new(0.0, 5.0)),
                        Segment::Arc(Arc2::new_cw(Point2::ORIGIN, 5.0, FRAC_PI_2, 0.0)),
                    ],
                    false,
                    tol,
                )
                .map_err(|e| e.to_string())?;
                single_fillet(scenario, &chain, 1, 1.0, tol)
            }
            Scenario::ArcArc => {
                let chain = Chain::from_segments(
                    &[
                        Segment::Arc(Arc2::new(Point2::ORIGIN, 5.0, 0.0, FRAC_PI_2)),
                        Segment::Arc(Arc2::new_cw(
                            Point2::new(0.0, 10.0),
                            5.0,
                            3.0 * FRAC_PI_2,
                            PI,
                        )),
                    ],
                    false,
                    tol,
                )
                .map_err(|e| e.to_string())?;
                single_fillet(scenario, &chain, 1, 1.0, tol)
            }
            Scenario::ClosedSquareAll => {
                let square = Chain::from_points(
                    &[
                        Point2::new(0.0, 0.0),
                        Point2::new(10.0, 0.0),
                        Point2::new(10.0, 10.0),
                        Point2::new(0.0, 10.0),
                    ],
                    true,
                );
                let (rounded, diag) = fillet_chain(&square, 2.0, tol).map_err(|e| e.to_string())?;
                let snapshot = chain_snapshot(scenario.name(), &rounded, |out| {
                    let _ = writeln!(out, "radius 2.000000");
                    write_fillet_chain_diagnostics(out, &diag);
                });
                Ok(ScenarioOutput {
                    name: scenario.name(),
                    summary: format!(
                        "corners={} filleted={} skipped={}",
                        diag.corner_count, diag.filleted_corner_count, diag.skipped_corner_count
                    ),
                    snapshot,
                })
            }
        }
    }

    fn right_angle() -> Chain {
        Chain::from_points(
            &[
                Point2::new(-10.0, 0.0),
                Point2::new(0.0, 0.0),
                Point2::new(0.0, 10.0),
            ],
            false,
        )
    }

    /// Rejected fillets are part of the snapshot, not a CLI failure.
    fn single_fillet(
        scenario: Scenario,
        chain: &Chain,
        index: usize,
        radius: f64,
        tol: Tolerance,
    ) -> Result<ScenarioOutput, String> {
        let name = scenario.name();
        let (summary, snapshot) =
            match apply_fillet_with_tolerance(chain, index, radius, tol) {
                Ok(outcome) => {
                    let snapshot = chain_snapshot(name, &outcome.chain, |out| {
                        let _ = writeln!(out, "radius {radius:.6}");
                        let _ = writeln!(out, "fillet.status ok");
                        write_fillet_report(out, &outcome.report);
                    });
                    let summary = format!(
                        "{:?} bulge={:.6} vertices={}",
                        outcome.report.kind,
                        outcome.report.bulge,
                        outcome.chain.len()
                    );
                    (summary, snapshot)
                }
                Err(err) => {
                    let snapshot = chain_snapshot(name, chain, |out| {
                        let _ = writeln!(out, "radius {radius:.6}");
                        let _ = writeln!(out, "fillet.status rejected");
                        let _ = writeln!(out, "fillet.error {err}");
                    });
                    (format!("rejected: {err}"), snapshot)
                }
            };

        Ok(ScenarioOutput {
            name,
            summary,
            snapshot,
        })
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
