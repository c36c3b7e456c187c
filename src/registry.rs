use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassroomEntry {
    pub code: &'static str,
    pub grade: u8,
    pub section: char,
    pub name: &'static str,
    pub capacity: u32,
}

const fn room(
    code: &'static str,
    grade: u8,
    section: char,
    name: &'static str,
) -> ClassroomEntry {
    ClassroomEntry {
        code,
        grade,
        section,
        name,
        capacity: 30,
    }
}

// 39 classrooms: grades 1, 3, 4 and 5 have sections A-H, grade 2 has A-G.
static CLASSROOMS: [ClassroomEntry; 39] = [
    room("100", 1, 'A', "1° A - 100"),
    room("101", 1, 'B', "1° B - 101"),
    room("102", 1, 'C', "1° C - 102"),
    room("103", 1, 'D', "1° D - 103"),
    room("104", 1, 'E', "1° E - 104"),
    room("105", 1, 'F', "1° F - 105"),
    room("106", 1, 'G', "1° G - 106"),
    room("107", 1, 'H', "1° H - 107"),
    room("200", 2, 'A', "2° A - 200"),
    room("201", 2, 'B', "2° B - 201"),
    room("202", 2, 'C', "2° C - 202"),
    room("203", 2, 'D', "2° D - 203"),
    room("204", 2, 'E', "2° E - 204"),
    room("205", 2, 'F', "2° F - 205"),
    room("206", 2, 'G', "2° G - 206"),
    room("300", 3, 'A', "3° A - 300"),
    room("301", 3, 'B', "3° B - 301"),
    room("302", 3, 'C', "3° C - 302"),
    room("303", 3, 'D', "3° D - 303"),
    room("304", 3, 'E', "3° E - 304"),
    room("305", 3, 'F', "3° F - 305"),
    room("306", 3, 'G', "3° G - 306"),
    room("307", 3, 'H', "3° H - 307"),
    room("400", 4, 'A', "4° A - 400"),
    room("401", 4, 'B', "4° B - 401"),
    room("402", 4, 'C', "4° C - 402"),
    room("403", 4, 'D', "4° D - 403"),
    room("404", 4, 'E', "4° E - 404"),
    room("405", 4, 'F', "4° F - 405"),
    room("406", 4, 'G', "4° G - 406"),
    room("407", 4, 'H', "4° H - 407"),
    room("500", 5, 'A', "5° A - 500"),
    room("501", 5, 'B', "5° B - 501"),
    room("502", 5, 'C', "5° C - 502"),
    room("503", 5, 'D', "5° D - 503"),
    room("504", 5, 'E', "5° E - 504"),
    room("505", 5, 'F', "5° F - 505"),
    room("506", 5, 'G', "5° G - 506"),
    room("507", 5, 'H', "5° H - 507"),
];

pub fn all() -> &'static [ClassroomEntry] {
    &CLASSROOMS
}

/// Exact, case-sensitive lookup by classroom code.
pub fn find(code: &str) -> Option<&'static ClassroomEntry> {
    CLASSROOMS.iter().find(|c| c.code == code)
}

pub fn by_grade(grade: u8) -> impl Iterator<Item = &'static ClassroomEntry> {
    CLASSROOMS.iter().filter(move |c| c.grade == grade)
}
