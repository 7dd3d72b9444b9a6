use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

pub const DEFAULT_MEMORY: usize = 200;

fn default_memory() -> usize {
    DEFAULT_MEMORY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortParams {
    // Per-day probabilities, by time since detection
    pub death_probs: [f64; 3], // [< time1, time1..time2, >= time2]
    pub heal_probs: [f64; 2],  // [time1..time2, >= time2]

    // Age thresholds in days since detection
    pub time1: usize,
    pub time2: usize,

    /// Number of tracked daily cohorts; older mass collects in the last slot.
    #[serde(default = "default_memory")]
    pub memory: usize,
}

impl CohortParams {
    pub fn check(&self) -> ModelResult<()> {
        if self.time1 == 0 {
            return Err(ModelError::InvalidCohortConfig("time1 must be >= 1".into()));
        }
        if self.time1 >= self.time2 {
            return Err(ModelError::InvalidCohortConfig(format!(
                "time1 ({}) must be < time2 ({})",
                self.time1, self.time2
            )));
        }
        if self.time2 > self.memory {
            return Err(ModelError::InvalidCohortConfig(format!(
                "time2 ({}) must be <= memory ({})",
                self.time2, self.memory
            )));
        }
        Ok(())
    }
}

/// Cohort masses grouped by time since detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SubPopulations {
    pub early: i64,  // age < time1
    pub middle: i64, // time1 <= age < time2
    pub late: i64,   // age >= time2
}

/// Fixed-length cohort sizes indexed by days since detection (0 = newest).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeBuffer {
    cohorts: Vec<i64>,
}

impl AgeBuffer {
    pub fn new(memory: usize) -> Self {
        Self { cohorts: vec![0; memory] }
    }

    /// Backlog is newest first and lands in slots `0..backlog.len()`; the
    /// older slots after it are zero-filled. Padding at the old end is what
    /// keeps each backlog cohort at its true age, since slot 0 is the newest.
    /// A backlog that does not fit is rejected rather than truncated.
    pub fn from_backlog(backlog: &[i64], memory: usize) -> ModelResult<Self> {
        if backlog.len() > memory {
            return Err(ModelError::BacklogTooLong { len: backlog.len(), memory });
        }
        if let Some((age, &value)) = backlog.iter().enumerate().find(|&(_, &v)| v < 0) {
            return Err(ModelError::NegativeBacklog { age, value });
        }
        let mut buf = Self::new(memory);
        buf.cohorts[..backlog.len()].copy_from_slice(backlog);
        Ok(buf)
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    pub fn cohorts(&self) -> &[i64] {
        &self.cohorts
    }

    pub fn total(&self) -> i64 {
        self.cohorts.iter().sum()
    }

    pub fn sub_populations(&self, time1: usize, time2: usize) -> SubPopulations {
        let c = &self.cohorts;
        SubPopulations {
            early: c[..time1].iter().sum(),
            middle: c[time1..time2].iter().sum(),
            late: c[time2..].iter().sum(),
        }
    }

    /// Shift every cohort one day older and insert `newest` at the front.
    ///
    /// The oldest slot doubles as the overflow bucket for ages >= memory - 1:
    /// the cohort leaving it is merged back in, so the shift conserves mass.
    /// This is deliberate. Dropping the tail instead would lose cases that
    /// the late sub-population still counts for deaths and healing.
    pub fn age_by_one_day(&mut self, newest: i64) {
        let Some(&overflow) = self.cohorts.last() else {
            return;
        };
        self.cohorts.rotate_right(1);
        self.cohorts[0] = newest;
        if self.cohorts.len() > 1 {
            let last = self.cohorts.len() - 1;
            self.cohorts[last] += overflow;
        }
    }

    /// Remove up to `quota` from slots younger than `below_age`, oldest first.
    /// Returns the amount actually removed.
    pub fn drain_oldest_first(&mut self, below_age: usize, quota: i64) -> i64 {
        let mut remaining = quota;
        let end = below_age.min(self.cohorts.len());
        for slot in self.cohorts[..end].iter_mut().rev() {
            if remaining <= 0 {
                break;
            }
            if *slot <= 0 {
                continue;
            }
            let taken = remaining.min(*slot);
            *slot -= taken;
            remaining -= taken;
        }
        quota.max(0) - remaining.max(0)
    }
}

/// Ledger entry for one simulated day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortDay {
    pub day: usize,
    pub inflow: i64,
    /// Grouping taken before the day's shift.
    pub sub_populations: SubPopulations,
    pub deaths: i64,
    /// Outflow quotas: [early, middle, late].
    pub outflow: [i64; 3],
    /// Buffer mass after the shift, before any outflow is removed.
    pub present: i64,
    pub removed: i64,
    pub cumulative_deaths: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortRun {
    pub days: Vec<CohortDay>,
    /// One entry per day plus the leading zero.
    pub cumulative_deaths: Vec<i64>,
    pub final_buffer: Vec<i64>,
}

pub struct CohortModel {
    pub params: CohortParams,
}

impl CohortModel {
    pub fn new(params: CohortParams) -> ModelResult<Self> {
        params.check()?;
        Ok(Self { params })
    }

    fn outflows(&self, pops: &SubPopulations) -> [i64; 3] {
        let [dp1, dp2, dp3] = self.params.death_probs;
        let [hp2, hp3] = self.params.heal_probs;
        [
            (dp1 * pops.early as f64) as i64,
            ((dp2 + hp2) * pops.middle as f64) as i64,
            ((dp3 + hp3) * pops.late as f64) as i64,
        ]
    }

    // Truncated once over the sum; need not match the truncated outflows.
    fn daily_deaths(&self, pops: &SubPopulations) -> i64 {
        let [dp1, dp2, dp3] = self.params.death_probs;
        (dp1 * pops.early as f64 + dp2 * pops.middle as f64 + dp3 * pops.late as f64) as i64
    }

    /// Propagate the daily inflow through the age buffer and keep the per-day ledger.
    pub fn run(&self, daily_inflow: &[i64], backlog: &[i64]) -> ModelResult<CohortRun> {
        if let Some((day, &value)) = daily_inflow.iter().enumerate().find(|&(_, &v)| v < 0) {
            return Err(ModelError::NegativeInflow { day, value });
        }
        let CohortParams { time1, time2, memory, .. } = self.params;
        let mut buffer = AgeBuffer::from_backlog(backlog, memory)?;

        let mut days = Vec::with_capacity(daily_inflow.len());
        let mut cumulative_deaths = Vec::with_capacity(daily_inflow.len() + 1);
        let mut cumulative = 0i64;
        cumulative_deaths.push(cumulative);

        for (day, &inflow) in daily_inflow.iter().enumerate() {
            let pops = buffer.sub_populations(time1, time2);
            let [out1, out2, out3] = self.outflows(&pops);
            let deaths = self.daily_deaths(&pops);

            buffer.age_by_one_day(inflow);
            let present = buffer.total();

            // Order matters: unrestricted, then < time2, then < time1.
            let mut removed = buffer.drain_oldest_first(memory, out3);
            removed += buffer.drain_oldest_first(time2, out2);
            removed += buffer.drain_oldest_first(time1, out1);

            cumulative += deaths;
            cumulative_deaths.push(cumulative);
            days.push(CohortDay {
                day,
                inflow,
                sub_populations: pops,
                deaths,
                outflow: [out1, out2, out3],
                present,
                removed,
                cumulative_deaths: cumulative,
            });
        }

        log::debug!(
            "cohort run: {} days, memory={}, cumulative deaths={}, still tracked={}",
            daily_inflow.len(),
            memory,
            cumulative,
            buffer.total()
        );

        Ok(CohortRun {
            days,
            cumulative_deaths,
            final_buffer: buffer.cohorts,
        })
    }

    /// Cumulative deaths, starting with the day-0 zero.
    pub fn simulate(&self, daily_inflow: &[i64], backlog: &[i64]) -> ModelResult<Vec<i64>> {
        self.run(daily_inflow, backlog).map(|run| run.cumulative_deaths)
    }
}
