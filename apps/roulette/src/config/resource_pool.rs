//! Built-in global resource pool.

use crate::domain::ResourceId;

pub const DEFAULT_RESOURCE_POOL: [&str; 40] = [
    "Aatrox", "Ahri", "Akali", "Alistar", "Amumu", "Annie", "Ashe", "Blitzcrank", "Braum",
    "Caitlyn", "Darius", "Diana", "Ekko", "Ezreal", "Fiora", "Garen", "Graves", "Irelia",
    "Janna", "Jarvan IV", "Jax", "Jinx", "Kaisa", "Karma", "LeeSin", "Leona", "Lux", "Malphite",
    "MissFortune", "Morgana", "Nami", "Orianna", "Sett", "Sylas", "Thresh", "Vi", "Viktor",
    "Xayah", "Yasuo", "Zed",
];

pub fn default_pool() -> Vec<ResourceId> {
    DEFAULT_RESOURCE_POOL.iter().map(ResourceId::new).collect()
}

/// Parse a comma-separated pool, dropping blanks and repeats (first wins).
pub fn parse_pool(raw: &str) -> Vec<ResourceId> {
    let mut pool: Vec<ResourceId> = Vec::new();
    for id in raw.split(',').filter_map(ResourceId::parse) {
        if !pool.contains(&id) {
            pool.push(id);
        }
    }
    pool
}
