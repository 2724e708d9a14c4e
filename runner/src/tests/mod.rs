use processor::format_logs;
use processor::Sim;
use scheduler::{Algorithm, Pid, Process, SchedulerConfig, Ticks};

use std::env;
use std::fs;


/// Every test replays its workload under each of these.
const SCHEDULERS: [Algorithm; 2] = [Algorithm::Fcfs, Algorithm::Spn];

fn output_path(algorithm: Algorithm, folder: &str, name: &str) -> String {
    let scheduler = algorithm.id().to_lowercase();
    format!("../outputs/{scheduler}/{folder}/{name}.log")
}

fn write_logs(algorithm: Algorithm, folder: &str, name: &str, logs: &str) {
    let scheduler = algorithm.id().to_lowercase();
    fs::create_dir_all(format!("../outputs/{scheduler}/{folder}")).unwrap();
    fs::write(output_path(algorithm, folder, name), logs).unwrap();
}

fn read_logs(algorithm: Algorithm, folder: &str, name: &str) -> String {
    fs::read_to_string(output_path(algorithm, folder, name)).unwrap()
}

fn workload(spec: &[(Ticks, &[Ticks])]) -> Vec<Process> {
    spec.iter()
        .enumerate()
        .map(|(pid, (arrival, bursts))| Process::new(Pid::new(pid), *arrival, bursts.to_vec()))
        .collect()
}

fn run(folder: &str, name: &str, processes: &[Process]) {
    for algorithm in SCHEDULERS {
        let policy = scheduler::from_config(&SchedulerConfig::new(algorithm)).unwrap();
        let logs = Sim::new(processes.to_vec(), policy).run().unwrap();
        let output = format_logs(&logs);

        if env::var("WRITE_OUTPUT").is_ok() {
            write_logs(algorithm, folder, name, &output);
        } else {
            let reference = read_logs(algorithm, folder, name);

            println!("\nScheduler {algorithm}\nleft = Correct Output\nright = Your Output\n");
            use pretty_assertions::assert_eq;
            assert_eq!(reference, output);
        }
    }
}
