//! One-shot report: which driver library loaded, what it exports, and what
//! each controller slot answers.

#[cfg(target_os = "windows")]
fn main() {
    use padbridge::backends::windows::Win32;
    use padbridge::{BatterySample, Bridge, DriverLoader, GamepadSample};

    let config = padbridge::logging::init_from_env();
    println!("candidates: {:?}", config.driver.candidates);

    let loader = DriverLoader::new(config.driver.clone());
    let status = loader.init(&Win32);
    println!("status: {status:?}");

    match (loader.loaded(), loader.error()) {
        (Some(driver), _) => {
            println!(
                "library: {}",
                driver.library.as_deref().unwrap_or("<injected>")
            );
            println!("capabilities: {:?}", driver.binding.capabilities());
        }
        (None, Some(err)) => {
            println!("error: {err}");
            return;
        }
        (None, None) => return,
    }

    let bridge = Bridge::with_loader(Win32, loader);
    bridge.init();
    for slot in 0..padbridge::MAX_CONTROLLERS {
        let mut sample = GamepadSample::default();
        let state = bridge.poll_gamepad(slot, &mut sample);
        let mut battery = BatterySample::default();
        let power = bridge.battery_info(slot, &mut battery);
        println!(
            "slot {slot}: state=0x{state:x} battery=0x{power:x} {:?}/{:?}",
            battery.battery_type(),
            battery.level()
        );
    }
    println!("focused: {}", bridge.is_focused());
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("the diagnose demo needs the Windows XInput driver");
}
