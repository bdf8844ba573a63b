// Suma de créditos por cubeta de prioridad, separando obligatorios y electivos.
use serde::Serialize;

use crate::algorithm::timetable::{PriorityBucket, Timetable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCredits {
    pub required: i64,
    pub elective: i64,
}

impl BucketCredits {
    pub fn total(&self) -> i64 {
        self.required + self.elective
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreditSummary {
    pub major1: BucketCredits,
    pub shared: BucketCredits,
    pub major2: BucketCredits,
    pub other: BucketCredits,
    pub information_application: BucketCredits,
    pub total: i64,
}

impl CreditSummary {
    pub fn bucket(&self, bucket: PriorityBucket) -> &BucketCredits {
        match bucket {
            PriorityBucket::Major1 => &self.major1,
            PriorityBucket::Shared => &self.shared,
            PriorityBucket::Major2 => &self.major2,
            PriorityBucket::Other => &self.other,
            PriorityBucket::InformationApplication => &self.information_application,
        }
    }

    fn bucket_mut(&mut self, bucket: PriorityBucket) -> &mut BucketCredits {
        match bucket {
            PriorityBucket::Major1 => &mut self.major1,
            PriorityBucket::Shared => &mut self.shared,
            PriorityBucket::Major2 => &mut self.major2,
            PriorityBucket::Other => &mut self.other,
            PriorityBucket::InformationApplication => &mut self.information_application,
        }
    }
}

/// Cada curso cuenta una vez aunque ocupe varias celdas. La categoría de la
/// entrada ya es la de la mención de su cubeta (la compartida usa la primera).
/// Cursos sin categoría no suman.
pub fn aggregate_credits(timetable: &Timetable) -> CreditSummary {
    let mut summary = CreditSummary::default();
    for entry in timetable.distinct_courses() {
        let Some(category) = entry.course_category else {
            continue;
        };
        let bucket = summary.bucket_mut(entry.bucket);
        if category.counts_as_required() {
            bucket.required += entry.credits;
        } else if category.counts_as_elective() {
            bucket.elective += entry.credits;
        }
    }
    summary.total = PriorityBucket::ALL.iter().map(|b| summary.bucket(*b).total()).sum();
    summary
}
