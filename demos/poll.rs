//! Poll every controller slot and print what changed, ~25 times a second.
//! Hold ESC (while this console has focus) to quit.

#[cfg(target_os = "windows")]
fn main() {
    use padbridge::backends::windows::Win32;
    use padbridge::{Bridge, GamepadSample, MAX_CONTROLLERS, SUCCESS};
    use std::time::{Duration, Instant};

    const VK_ESCAPE: u8 = 0x1B;

    let config = padbridge::logging::init_from_env();

    let bridge = Bridge::new(Win32, &config);
    bridge.init();
    println!("driver: {:?}", bridge.status());
    if let Some(err) = bridge.load_error() {
        eprintln!("{err}");
        return;
    }

    let flush_every = Duration::from_millis(40);
    let mut last_flush = Instant::now();
    let mut last = [None::<GamepadSample>; MAX_CONTROLLERS as usize];

    loop {
        if last_flush.elapsed() >= flush_every {
            for (slot, prev) in last.iter_mut().enumerate() {
                let mut sample = GamepadSample::default();
                let status = bridge.poll_gamepad(slot as u32, &mut sample);
                let now = (status == SUCCESS).then_some(sample);

                if now == *prev {
                    continue;
                }
                match now {
                    Some(s) => {
                        let [lx, ly, rx, ry] = s.sticks();
                        let [lt, rt] = s.triggers();
                        println!(
                            "#{slot}: L=({lx:+.3},{ly:+.3}) R=({rx:+.3},{ry:+.3}) \
                             LT={lt:.3} RT={rt:.3} [{:?}]",
                            s.buttons()
                        );
                    }
                    None => println!("#{slot}: disconnected (0x{status:x})"),
                }
                *prev = now;
            }
            last_flush = Instant::now();
        }

        if bridge.is_focused() && bridge.keyboard_snapshot().is_held(VK_ESCAPE) {
            break;
        }

        // Keep CPU usage sane
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("the poll demo needs the Windows XInput driver");
}
