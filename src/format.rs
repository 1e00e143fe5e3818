use colored::Colorize;
use std::collections::BTreeMap;
use std::time::Duration;
use threatscope::scenario::{ScenarioResult, StepFailure};

/// Print a separator line
pub fn print_separator(width: usize) {
    println!("{}", "═".repeat(width).dimmed());
}

fn failure_location(failure: &StepFailure) -> String {
    match &failure.threat {
        Some(threat) => format!("step {} ({})", failure.step, threat),
        None => format!("step {}", failure.step),
    }
}

/// Print one line per scenario, then the failures and a totals line
pub fn print_pretty(results: &[ScenarioResult], elapsed: Duration, verbose: bool, width: usize) {
    for result in results {
        if result.success {
            println!("{} {}", "✓".green(), result.name);
        } else {
            println!("{} {}", "✗".red().bold(), result.name.red());
        }
        if verbose || !result.success {
            for failure in &result.failures {
                println!(
                    "    {} expected {}, got {}",
                    failure_location(failure).dimmed(),
                    failure.expected.green(),
                    failure.actual.red()
                );
            }
        }
    }

    let total = results.len();
    let passed = results.iter().filter(|r| r.success).count();
    let failed = total - passed;

    println!();
    print_separator(width);
    let summary = format!(
        "{} scenarios, {} passed, {} failed in {:.2}s",
        total,
        passed,
        failed,
        elapsed.as_secs_f64()
    );
    if failed == 0 {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}

/// Print results as JSON to stdout
pub fn print_json(results: &[ScenarioResult], elapsed: Duration) -> serde_json::Result<()> {
    let total = results.len();
    let passed = results.iter().filter(|r| r.success).count();
    let failed = total - passed;

    let scenario_objects: Vec<serde_json::Value> = results
        .iter()
        .map(|r| {
            let failures: Vec<serde_json::Value> = r
                .failures
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "step": f.step,
                        "threat": f.threat,
                        "expected": f.expected,
                        "actual": f.actual,
                    })
                })
                .collect();
            serde_json::json!({
                "name": r.name,
                "success": r.success,
                "steps_run": r.steps_run,
                "execution_time_ms": r.execution_time_ms,
                "failures": failures,
            })
        })
        .collect();

    let output = serde_json::json!({
        "summary": {
            "total": total,
            "passed": passed,
            "failed": failed,
            "duration_secs": elapsed.as_secs_f64(),
        },
        "scenarios": scenario_objects,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results in TAP (Test Anything Protocol) version 13 format
pub fn print_tap(results: &[ScenarioResult]) {
    println!("TAP version 13");
    println!("1..{}", results.len());

    for (i, result) in results.iter().enumerate() {
        let number = i + 1;
        if result.success {
            println!("ok {} - {}", number, result.name);
        } else {
            println!("not ok {} - {}", number, result.name);
            if let Some(failure) = result.failures.first() {
                println!("  ---");
                println!(
                    "  message: \"expected {}, got {}\"",
                    failure.expected, failure.actual
                );
                println!("  at: \"{}\"", failure_location(failure));
                println!("  ...");
            }
        }
    }
}

/// Print results in JUnit XML format
pub fn print_junit(results: &[ScenarioResult], elapsed: Duration) {
    print!("{}", junit_report(results, elapsed));
}

/// Build a JUnit document with one `<testsuite>` per scenario directory.
///
/// A failed scenario carries a single `<failure>` whose body lists every
/// failed expectation, one per line.
fn junit_report(results: &[ScenarioResult], elapsed: Duration) -> String {
    let mut suites: BTreeMap<&str, Vec<&ScenarioResult>> = BTreeMap::new();
    for result in results {
        let dir = result.name.rsplit_once('/').map_or("", |(dir, _)| dir);
        suites.entry(dir).or_default().push(result);
    }

    let failed = results.iter().filter(|r| !r.success).count();
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<testsuites name=\"threatscope\" tests=\"{}\" failures=\"{}\" time=\"{:.3}\">\n",
        results.len(),
        failed,
        elapsed.as_secs_f64()
    ));

    for (dir, members) in &suites {
        let suite_name = if dir.is_empty() {
            "scenarios".to_string()
        } else {
            dir.replace('/', ".")
        };
        let suite_failed = members.iter().filter(|r| !r.success).count();
        let suite_ms: u64 = members.iter().map(|r| r.execution_time_ms).sum();
        xml.push_str(&format!(
            "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" time=\"{:.3}\">\n",
            xml_escape(&suite_name),
            members.len(),
            suite_failed,
            suite_ms as f64 / 1000.0
        ));

        for result in members {
            let leaf = result.name.rsplit_once('/').map_or(result.name.as_str(), |(_, leaf)| leaf);
            xml.push_str(&format!(
                "    <testcase classname=\"{}\" name=\"{}\" time=\"{:.3}\">\n",
                xml_escape(&suite_name),
                xml_escape(leaf),
                result.execution_time_ms as f64 / 1000.0
            ));
            xml.push_str(&format!(
                "      <properties><property name=\"steps_run\" value=\"{}\"/></properties>\n",
                result.steps_run
            ));
            if !result.success {
                xml.push_str(&format!(
                    "      <failure type=\"expectation\" message=\"{} of {} steps failed\">",
                    result.failures.len(),
                    result.steps_run
                ));
                for failure in &result.failures {
                    xml.push_str(&xml_escape(&format!(
                        "\n{}: expected {}, got {}",
                        failure_location(failure),
                        failure.expected,
                        failure.actual
                    )));
                }
                xml.push_str("\n      </failure>\n");
            }
            xml.push_str("    </testcase>\n");
        }
        xml.push_str("  </testsuite>\n");
    }

    xml.push_str("</testsuites>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
