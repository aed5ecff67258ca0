use vela_log::{Color, Level, LevelFmt, LogFmt, info, debug, error};

use vela_mem::{CapacityError, DynArray, FixedArray};

fn report<T: core::fmt::Display>(step: &str, array: &DynArray<T>) {
    info!("{:<14} {} (len {}, capacity {})", step, array, array.len(), array.capacity());
}

fn scenario() -> Result<DynArray<i32>, CapacityError> {
    let mut array = DynArray::<i32>::new();
    report("new", &array);
    for value in 1..=3 {
        array.push_back(value)?;
        debug!("pushed {}, capacity now {}", value, array.capacity());
    }
    report("push 1 2 3", &array);
    array.insert(1, 99)?;
    report("insert 99 @1", &array);
    array.erase(0);
    report("erase @0", &array);
    array.resize(5)?;
    report("resize 5", &array);
    array.resize(2)?;
    report("resize 2", &array);
    Ok(array)
}

fn fixed_limits() -> Result<(), CapacityError> {
    let mut fixed = FixedArray::<u8>::with_capacity(2)?;
    fixed.push_back(1)?;
    fixed.push_back(2)?;
    if let Err(err) = fixed.push_back(3) {
        info!("fixed array refused a third element: {}", err);
    }
    Ok(())
}

fn main() {
    vela_log::init();
    let summary = vela_log::custom_fmt(LogFmt::leveled("SUMMARY", Color::Cyan))
        .ok()
        .flatten();
    match scenario() {
        Ok(array) => {
            let copy = array.clone();
            if let Some(fmt) = summary {
                if let Err(err) = vela_log::log(
                    module_path!(),
                    LevelFmt::Other(fmt, Level::Always),
                    format_args!("final {} / copy {}", array, copy),
                ) {
                    error!("summary failed: {}", err);
                }
            }
        },
        Err(err) => {
            error!("scenario failed: {}", err);
        },
    }
    if let Err(err) = fixed_limits() {
        error!("fixed array demo failed: {}", err);
    }
}
