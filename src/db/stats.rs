use crate::core::ledger::summarize;
use crate::db::nights::NightRepository;
use crate::db::places::PlaceRepository;
use crate::db::pool::DbPool;
use crate::db::users::UserRepository;
use crate::errors::AppResult;
use std::fs;

const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const GREY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) NIGHTS AND TRACKED RANGE
    //
    let nights = NightRepository::new(&mut pool.conn).all_ordered()?;
    let summary = summarize(&nights);

    println!(
        "{}• Total nights:{} {}{}{}",
        CYAN, RESET, GREEN, summary.count, RESET
    );

    println!("{}• Tracked range:{}", CYAN, RESET);
    match &summary.range {
        Some(range) => {
            println!("    from: {}", range.first);
            println!("    to:   {}", range.last);
            println!(
                "{}• Missing nights:{} {}{}{}",
                CYAN, RESET, GREEN, range.missing, RESET
            );
        }
        None => {
            println!("    from: {GREY}--{RESET}");
            println!("    to:   {GREY}--{RESET}");
        }
    }

    //
    // 3) PLACES AND USERS
    //
    let nb_places = PlaceRepository::new(&pool.conn).count()?;
    let nb_users = UserRepository::new(&pool.conn).count()?;
    println!("{}• Places:{} {}", CYAN, RESET, nb_places);
    println!("{}• Users:{}  {}", CYAN, RESET, nb_users);

    println!();
    Ok(())
}
