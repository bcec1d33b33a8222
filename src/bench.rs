//! Minimal timing harness for `harness = false` bench targets.
use std::fs;
use std::io::{self, stdout, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    iterations: usize,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Unit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
}

impl Unit {
    pub fn format(&self, d: &Duration, width: usize) -> String {
        let (symbol, value) = match self {
            Self::Nanosecond => ("ns", d.as_nanos()),
            Self::Microsecond => ("us", d.as_micros()),
            Self::Millisecond => ("ms", d.as_millis()),
            Self::Second => ("s", d.as_secs() as u128),
        };
        format!("{:>width$}{:<2}", value, symbol)
    }

    /// Largest unit in which `d` still reads as at least `treshold`.
    pub fn scaled(d: &Duration, treshold: u128) -> Self {
        if d.as_nanos() < treshold {
            Self::Nanosecond
        } else if d.as_micros() < treshold {
            Self::Microsecond
        } else if d.as_millis() < treshold {
            Self::Millisecond
        } else {
            Self::Second
        }
    }
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            iterations: n.max(1),
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn run(&self) -> Duration {
        let start = Instant::now();
        for _ in 0..self.iterations {
            (self.f)();
        }
        start.elapsed()
    }
}

#[derive(Clone, Debug)]
pub struct BenchResult {
    pub name: String,
    pub iterations: usize,
    pub total: Duration,
}

impl BenchResult {
    pub fn per_call(&self) -> Duration {
        self.total.div_f64(self.iterations as f64)
    }
}

#[derive(Default)]
pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<BenchResult>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bench(&mut self, bench: Benchmark) {
        self.benches.push(bench);
    }

    pub fn with_benches(benches: Vec<Benchmark>) -> Self {
        let mut this = Self::new();
        for bench in benches {
            this.add_bench(bench);
        }
        this
    }

    pub fn results(&self) -> &[BenchResult] {
        &self.results
    }

    pub fn run(&mut self) -> io::Result<()> {
        let mut out = stdout();
        for bench in &self.benches {
            let total = bench.run();
            self.results.push(BenchResult {
                name: bench.name.clone(),
                iterations: bench.iterations,
                total,
            });
            write!(out, ".")?;
            out.flush()?;
        }
        writeln!(out)
    }

    pub fn show(&self) -> io::Result<()> {
        let mut out = stdout();
        writeln!(out, "  {: <30} {: >8}   {: >8}", "benchmark", "total", "per_call")?;
        for r in &self.results {
            let per_call = r.per_call();
            writeln!(
                out,
                "  {: <30} {}   {}",
                r.name,
                Unit::scaled(&r.total, 100000).format(&r.total, 6),
                Unit::scaled(&per_call, 100000).format(&per_call, 6),
            )?;
        }
        out.flush()
    }

    pub fn csv(&self) -> String {
        let mut lines = vec!["benchmark,total_us,iterations,per_call_us".to_string()];
        for r in &self.results {
            lines.push(format!(
                "{},{},{},{}",
                r.name,
                r.total.as_micros(),
                r.iterations,
                r.per_call().as_micros(),
            ));
        }
        lines.push(String::new());
        lines.join("\n")
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.csv())
    }

    pub fn report(&mut self, name: &str) -> io::Result<()> {
        print!("Benchmark: {}", name);
        self.run()?;
        self.show()?;
        self.write_csv(format!("benchmark_{}.csv", name))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_unit_scaled() {
        assert_eq!(Unit::scaled(&Duration::from_nanos(50), 1000), Unit::Nanosecond);
        assert_eq!(Unit::scaled(&Duration::from_micros(50), 1000), Unit::Microsecond);
        assert_eq!(Unit::scaled(&Duration::from_secs(50), 1000), Unit::Second);
        assert_eq!(Unit::Millisecond.format(&Duration::from_millis(12), 4), "  12ms");
    }

    #[test]
    fn test_report_runs_each_iteration() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let bench = Benchmark::iter("count", 5, move || counter.set(counter.get() + 1));
        let mut report = BenchmarkReport::with_benches(vec![bench, Benchmark::once("noop", || ())]);
        report.run().unwrap();
        assert_eq!(calls.get(), 5);
        assert_eq!(report.results().len(), 2);
        assert_eq!(report.results()[0].iterations, 5);

        let csv = report.csv();
        assert!(csv.starts_with("benchmark,total_us,iterations,per_call_us\ncount,"));
        assert_eq!(csv.lines().count(), 3);
    }
}
