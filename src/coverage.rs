//! Functional coverage bookkeeping.
//!
//! Every coverpoint keeps one bin per distinct observed value together with
//! its hit count. Bins are only ever added, so coverage never goes backwards.

use intmap::IntMap;
use prettytable::{Cell, Row, Table};

use crate::value::DataWidth;

/// One-bit status outputs whose both states must be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Overflow,
    Underflow,
}

impl Flag {
    pub fn name(&self) -> &'static str {
        match self {
            Flag::Overflow => "o_overflow",
            Flag::Underflow => "o_underflow",
        }
    }
}

/// Which data coverpoint a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSet {
    /// Data of accepted writes.
    Input,
    /// Data seen on `o_data`.
    Output,
}

pub struct CoverPoint {
    name: &'static str,
    // value -> hit count
    bins: IntMap<u64>,
    domain: u64,
}

impl CoverPoint {
    pub fn new(name: &'static str, domain: u64) -> Self {
        Self {
            name,
            bins: IntMap::new(),
            domain,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn domain(&self) -> u64 {
        self.domain
    }

    /// Records one observation. Returns true if it opened a new bin.
    pub fn sample(&mut self, value: u64) -> bool {
        if let Some(hits) = self.bins.get_mut(value) {
            *hits += 1;
            false
        } else {
            self.bins.insert(value, 1);
            true
        }
    }

    pub fn contains(&self, value: u64) -> bool {
        self.bins.contains_key(value)
    }

    pub fn hits(&self, value: u64) -> u64 {
        self.bins.get(value).copied().unwrap_or(0)
    }

    /// Hit count of the least-sampled bin of the domain.
    pub fn min_hits(&self) -> u64 {
        (0..self.domain).map(|v| self.hits(v)).min().unwrap_or(0)
    }

    /// Number of distinct values observed.
    pub fn covered(&self) -> u64 {
        self.bins.len() as u64
    }

    pub fn is_closed(&self) -> bool {
        self.covered() == self.domain
    }

    pub fn percent(&self) -> f64 {
        if self.domain == 0 {
            return 100.0;
        }
        self.covered() as f64 * 100.0 / self.domain as f64
    }

    /// Values not yet observed, in ascending order, at most `limit` of them.
    pub fn missing(&self, limit: usize) -> Vec<u64> {
        (0..self.domain)
            .filter(|v| !self.contains(*v))
            .take(limit)
            .collect()
    }
}

pub struct CoverageTracker {
    width: DataWidth,
    input_data: CoverPoint,
    output_data: CoverPoint,
    overflow: CoverPoint,
    underflow: CoverPoint,
}

impl CoverageTracker {
    pub fn new(width: DataWidth) -> Self {
        Self {
            width,
            input_data: CoverPoint::new("i_data", width.domain_size()),
            output_data: CoverPoint::new("o_data", width.domain_size()),
            overflow: CoverPoint::new(Flag::Overflow.name(), 2),
            underflow: CoverPoint::new(Flag::Underflow.name(), 2),
        }
    }

    pub fn width(&self) -> DataWidth {
        self.width
    }

    pub fn record_input(&mut self, value: u32) -> bool {
        self.input_data.sample((value & self.width.mask()) as u64)
    }

    pub fn record_output(&mut self, value: u32) -> bool {
        self.output_data.sample((value & self.width.mask()) as u64)
    }

    pub fn record_flag(&mut self, flag: Flag, value: bool) -> bool {
        self.flag_point_mut(flag).sample(value as u64)
    }

    /// True iff `value` has already been seen on `o_data`.
    pub fn is_value_covered(&self, value: u32) -> bool {
        self.is_covered(DataSet::Output, value)
    }

    pub fn is_covered(&self, set: DataSet, value: u32) -> bool {
        self.data_point(set).contains((value & self.width.mask()) as u64)
    }

    pub fn is_closed(&self, set: DataSet) -> bool {
        self.data_point(set).is_closed()
    }

    /// Every data value has been seen on `o_data`.
    pub fn data_coverage_closed(&self) -> bool {
        self.output_data.is_closed()
    }

    /// Both states of both status flags have been seen.
    pub fn flag_coverage_closed(&self) -> bool {
        self.overflow.is_closed() && self.underflow.is_closed()
    }

    pub fn data_point(&self, set: DataSet) -> &CoverPoint {
        match set {
            DataSet::Input => &self.input_data,
            DataSet::Output => &self.output_data,
        }
    }

    pub fn flag_point(&self, flag: Flag) -> &CoverPoint {
        match flag {
            Flag::Overflow => &self.overflow,
            Flag::Underflow => &self.underflow,
        }
    }

    fn flag_point_mut(&mut self, flag: Flag) -> &mut CoverPoint {
        match flag {
            Flag::Overflow => &mut self.overflow,
            Flag::Underflow => &mut self.underflow,
        }
    }

    pub fn points(&self) -> [&CoverPoint; 4] {
        [
            &self.input_data,
            &self.output_data,
            &self.overflow,
            &self.underflow,
        ]
    }

    pub fn report_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(Row::new(vec![
            Cell::new("coverpoint"),
            Cell::new("bins"),
            Cell::new("domain"),
            Cell::new("coverage"),
            Cell::new("min hits"),
            Cell::new("missing"),
        ]));
        for point in self.points() {
            let missing = point
                .missing(8)
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            let missing = if point.domain() - point.covered() > 8 {
                format!("{},...", missing)
            } else {
                missing
            };
            table.add_row(Row::new(vec![
                Cell::new(point.name()),
                Cell::new(&point.covered().to_string()),
                Cell::new(&point.domain().to_string()),
                Cell::new(&format!("{:.1}%", point.percent())),
                Cell::new(&point.min_hits().to_string()),
                Cell::new(&missing),
            ]));
        }
        table
    }
}
