use super::config::EnergyLayout;
use super::energy::EnergyRecord;
use super::error::EngineError;
use std::io::Write;
use std::path::Path;

/// Per-frame energies of a run, stored column by column in single precision.
///
/// Row `i` belongs to frame `i` of the input trajectory. The `next_to_last` column only
/// exists for [`EnergyLayout::WithNextToLast`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTable {
    layout: EnergyLayout,
    initial: Vec<f32>,
    next_to_last: Vec<f32>,
    final_energy: Vec<f32>,
}

impl EnergyTable {
    pub fn new(layout: EnergyLayout) -> Self {
        Self {
            layout,
            initial: Vec::new(),
            next_to_last: Vec::new(),
            final_energy: Vec::new(),
        }
    }

    /// Appends the energies of the next frame.
    ///
    /// A next-to-last energy is dropped for the two-column layout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Internal`] if the layout has a `next_to_last` column and the
    /// record carries no such value.
    pub fn push(&mut self, record: &EnergyRecord) -> Result<(), EngineError> {
        if self.layout == EnergyLayout::WithNextToLast {
            let next_to_last = record.next_to_last.ok_or_else(|| {
                EngineError::Internal(
                    "energy record has no next-to-last value for a three-column table".into(),
                )
            })?;
            self.next_to_last.push(next_to_last as f32);
        }
        self.initial.push(record.initial as f32);
        self.final_energy.push(record.final_energy as f32);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.initial.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_empty()
    }

    pub fn layout(&self) -> EnergyLayout {
        self.layout
    }

    pub fn column_names(&self) -> &'static [&'static str] {
        self.layout.column_names()
    }

    /// Looks a column up by name; `None` for names the layout does not have.
    pub fn column(&self, name: &str) -> Option<&[f32]> {
        match name {
            "initial" => Some(self.initial.as_slice()),
            "next_to_last" if self.layout == EnergyLayout::WithNextToLast => {
                Some(self.next_to_last.as_slice())
            }
            "final" => Some(self.final_energy.as_slice()),
            _ => None,
        }
    }

    pub fn initial(&self) -> &[f32] {
        &self.initial
    }

    pub fn next_to_last(&self) -> Option<&[f32]> {
        self.column("next_to_last")
    }

    pub fn final_energies(&self) -> &[f32] {
        &self.final_energy
    }

    /// Row-wise view in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<f32>> + '_ {
        (0..self.len()).map(move |i| match self.layout {
            EnergyLayout::InitialFinal => vec![self.initial[i], self.final_energy[i]],
            EnergyLayout::WithNextToLast => vec![
                self.initial[i],
                self.next_to_last[i],
                self.final_energy[i],
            ],
        })
    }

    /// Writes the table as CSV with a header row of column names.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.column_names())?;
        for row in self.rows() {
            csv_writer.write_record(row.iter().map(|value| value.to_string()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_csv_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), csv::Error> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}
