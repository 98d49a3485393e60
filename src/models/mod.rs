pub mod common;

pub mod users {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod colleges {
    pub mod entities;
    pub mod requests;
}

pub mod departments {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod academic_years {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod semesters {
    pub mod entities;
    pub mod requests;
}

pub mod subjects {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod divisions {
    pub mod entities;
    pub mod requests;
}

pub mod students {
    pub mod entities;
    pub mod requests;
}

pub mod faculty {
    pub mod entities;
    pub mod requests;
}

pub mod courses {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod assignments {
    pub mod entities;
    pub mod requests;
}

pub mod exams {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod exam_results {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod attendance {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod submissions {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod certificates {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub mod internships {
    pub mod entities;
    pub mod requests;
    pub mod responses;
}

pub use common::enums::*;
pub use common::response::{ApiMessageResponse, ApiResponse};
