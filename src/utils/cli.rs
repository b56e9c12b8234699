use crate::utils::error::DeployError;
use clap::Parser;

/// 參數錯誤一律以 1 結束；--help / --version 以 0 結束
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

pub fn exit_with_error(context: &str, e: &DeployError) -> ! {
    tracing::error!("❌ {}: {}", context, e);
    eprintln!("❌ Error: {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}
