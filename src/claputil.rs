use std::ffi::OsStr;

use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};
use kube::config::Kubeconfig;

pub use clap_complete::env::CompleteEnv;

/// Create an `ArgValueCompleter` that lists contexts from the active
/// kubeconfig, with the current context offered first.
pub fn context_value_completer() -> ArgValueCompleter {
    ArgValueCompleter::new(|input: &OsStr| -> Vec<CompletionCandidate> {
        let kubeconfig = match Kubeconfig::read() {
            Ok(config) => config,
            Err(_) => return Vec::new(),
        };

        let input = input.to_string_lossy();
        let input = input.trim();
        let current = kubeconfig.current_context.as_deref();

        let mut completions = Vec::new();
        for named_context in kubeconfig.contexts {
            if !named_context.name.starts_with(input) {
                continue;
            }
            let candidate = CompletionCandidate::new(named_context.name.as_str());
            if current == Some(named_context.name.as_str()) {
                completions.insert(0, candidate);
            } else {
                completions.push(candidate);
            }
        }
        completions
    })
}
