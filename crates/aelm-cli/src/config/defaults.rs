use aelm::engine::config::BackendKind;

/// File names and command line a backend runs with unless configured otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendDefaults {
    pub command: &'static str,
    pub input_file: &'static str,
    pub log_file: &'static str,
    pub trajectory_file: &'static str,
}

pub struct DefaultsConfig {
    pub backend: BackendKind,
    pub remove_temporary_files: bool,
    pub verbose: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Lammps,
            remove_temporary_files: true,
            verbose: false,
        }
    }
}

impl DefaultsConfig {
    pub fn for_backend(&self, backend: BackendKind) -> BackendDefaults {
        match backend {
            BackendKind::Lammps => BackendDefaults {
                command: "./lmp -in in.minimization",
                input_file: "in.frame",
                log_file: "log.lammps",
                trajectory_file: "dump.minimization.lammpstrj",
            },
            BackendKind::Gems => BackendDefaults {
                command: "./gems lbfgs.gms",
                input_file: "to_min.xyz",
                log_file: "lbfgs.log",
                trajectory_file: "traj.lbfgs.xyz",
            },
        }
    }
}
