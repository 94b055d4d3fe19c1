use serde::{Deserialize, Serialize};

/// The signed-in employee. Field names match the stored record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub role: String,
    pub company: CompanyInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub company_name: String,
    pub tax_id: String,
    pub industry: String,
    pub employee_count: String,
    pub department: String,
    pub office_location: String,
    pub work_email: String,
    pub phone: String,
}

impl UserProfile {
    /// The built-in demo account used by the quick-login path.
    pub fn demo() -> Self {
        Self {
            name: "Usuario Demo".into(),
            email: "demo@neurobot.com".into(),
            role: "Usuario".into(),
            company: CompanyInfo {
                company_name: "NeuroBOT Corp".into(),
                tax_id: "900.123.456-7".into(),
                industry: "Tecnología".into(),
                employee_count: "100-500".into(),
                department: "Innovación".into(),
                office_location: "Sede Principal".into(),
                work_email: "demo@neurobot.com".into(),
                phone: "+57 300 000 0000".into(),
            },
        }
    }

    /// Whether `email` identifies this user (personal or work address).
    pub fn matches_email(&self, email: &str) -> bool {
        let email = email.trim();
        !email.is_empty() && (self.email == email || self.company.work_email == email)
    }
}
