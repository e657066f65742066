//! Most-predicted ranking list
//!
//! Display-only top-10; the entries are a fixed snapshot and have no
//! interaction with the search session.

/// One row of the most-predicted ranking
#[derive(Debug, Clone)]
pub struct RankEntry {
    pub rank: u32,
    pub name: &'static str,
    pub count: u32,
}

/// The top-10 most-predicted stocks
pub fn most_predicted() -> Vec<RankEntry> {
    [
        (1, "삼성전자", 32),
        (2, "카카오", 28),
        (3, "네이버", 25),
        (4, "LG에너지솔루션", 20),
        (5, "현대차", 19),
        (6, "셀트리온", 17),
        (7, "하이브", 16),
        (8, "삼성SDI", 15),
        (9, "SK하이닉스", 13),
        (10, "포스코홀딩스", 11),
    ]
    .into_iter()
    .map(|(rank, name, count)| RankEntry { rank, name, count })
    .collect()
}
