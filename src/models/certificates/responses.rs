use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationCount {
    pub issuing_organization: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateStatistics {
    pub total_certificates: u64,
    pub certificates_this_month: u64,
    pub top_issuing_organizations: Vec<OrganizationCount>,
    pub students_with_certificates: u64,
}
