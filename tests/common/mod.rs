#![allow(dead_code)]

use jikanwari::algorithm::{GridEntry, PriorityBucket};
use jikanwari::bulletin::{RawSectionRecord, parse_bulletin};
use jikanwari::models::{CourseCategory, OfferingCategory};
use jikanwari::storage::{import_bulletin, open_in_memory};
use rusqlite::Connection;

/// Boletín pequeño: semestre 3 (2年前期) con IS/NC en conflicto el lunes 1,
/// un curso compartido, uno intensivo, uno "その他" y uno de información aplicada.
pub const SAMPLE_BULLETIN: &str = "\u{feff}時間割コード,シラバスURL,開講科目名,単位数,開講区分ID,授業形態ID,授業種別ID,主担当教員ID,曜日,時限,学年 ,メジャー,履修区分ID,教室名
A001,https://syllabus.example/A001,Algorithms,2,前期,講義,普通,Tanaka,月,1,2,IS,必修,A101
A001,https://syllabus.example/A001b,Algorithms (dup),3,前期,講義,普通,Suzuki,月,1,3,XD,選択,A102
A002,,Networks,2,前期,講義,普通,Sato,月,1,23,NC,必修,B201
A003,,Databases,2,後期,講義,普通,Tanaka,月,1,2,IS,必修,A101
A004,,Shared Seminar,1,前期,演習,普通,Ito,火,2,2,ISNC,選択,C301 C302
A005,,Intensive Lab,2,前期,実験,集中,Kato,その他,その他,2,IS,必修,
A006,,情報応用演習,1,前期,演習,普通,,水,3,2,その他,選択,
A007,,General Ethics,2,通年,講義,普通,Yamada,木,4,2,その他,必修,D401
,,Orphan row,2,前期,講義,普通,Nobody,金,5,2,IS,必修,
";

pub fn sample_records() -> Vec<RawSectionRecord> {
    parse_bulletin(SAMPLE_BULLETIN).expect("sample bulletin parses")
}

/// Base en memoria con el boletín de ejemplo ya importado.
pub fn loaded_db() -> Connection {
    let mut conn = open_in_memory().expect("in-memory db");
    import_bulletin(&mut conn, &sample_records()).expect("import succeeds");
    conn
}

pub fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .expect("count query")
}

pub fn entry(code: &str, offering: Option<OfferingCategory>, bucket: PriorityBucket) -> GridEntry {
    GridEntry {
        timetable_code: code.to_string(),
        course_title: format!("Course {}", code),
        instructor: None,
        bucket,
        offering_category: offering,
        offering_category_name: None,
        course_category: Some(CourseCategory::Required),
        credits: 2,
        classroom: "未定".to_string(),
        syllabus_url: None,
    }
}
