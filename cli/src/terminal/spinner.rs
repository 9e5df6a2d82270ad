use std::sync::OnceLock;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TIP_DELAY: Duration = Duration::from_secs(6);
const TIPS: &[&str] = &["You can press 'q' and Enter to stop the survey"];

pub struct SpinnerHandle {
    spinner: ProgressBar,
    tx: Sender<String>,
}

impl SpinnerHandle {
    pub fn send_to_queue(&self, message: String) {
        let _ = self.tx.send(message);
    }

    pub fn println(&self, msg: &str) {
        self.spinner.println(msg);
    }

    pub fn finish_and_clear(&self) {
        self.spinner.finish_and_clear();
    }
}

static SPINNER: OnceLock<SpinnerHandle> = OnceLock::new();

/// Lazily creates the spinner. Only the survey loop should call this; other
/// commands leave it untouched so their output stays plain.
pub fn get() -> &'static SpinnerHandle {
    SPINNER.get_or_init(init_spinner)
}

pub fn active() -> Option<&'static SpinnerHandle> {
    SPINNER.get()
}

fn init_spinner() -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap()
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));

    let (tx, rx) = mpsc::channel::<String>();
    let pb_clone = pb.clone();

    thread::spawn(move || {
        let mut tip_index = 0;
        loop {
            if pb_clone.is_finished() {
                break;
            }

            match rx.recv_timeout(TIP_DELAY) {
                Ok(mut msg) => {
                    // Only the newest queued message matters.
                    while let Ok(newer) = rx.try_recv() {
                        msg = newer;
                    }
                    pb_clone.set_message(msg);
                }
                Err(RecvTimeoutError::Timeout) => {
                    let tip = TIPS[tip_index % TIPS.len()];
                    pb_clone.set_message(format!("{}", tip.italic().white()));
                    tip_index += 1;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    SpinnerHandle { spinner: pb, tx }
}

pub fn report_round(count: usize) {
    get().send_to_queue(format!(
        "{} access points in the last round...",
        count.to_string().green().bold()
    ));
}

/// Routes log output above the spinner while one is running, to stderr
/// otherwise.
pub struct SpinnerWriter;

impl std::io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match active() {
            Some(handle) => handle.println(msg),
            None => eprintln!("{msg}"),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
