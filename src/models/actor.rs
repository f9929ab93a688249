use crate::error::{Error, Result};
use crate::models::profile::{EnterpriseProfile, StudentProfile};
use crate::models::user::{User, UserType};

/// Per-type profile of the authenticated user, resolved once per request.
#[derive(Debug, Clone)]
pub enum Profile {
    Student(StudentProfile),
    Enterprise(EnterpriseProfile),
    Admin,
    /// Student or enterprise account that has not filled in its profile yet.
    Incomplete(UserType),
}

/// The caller every service operation acts on behalf of.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    pub profile: Profile,
}

impl Actor {
    pub fn new(user: User, profile: Profile) -> Self {
        Self { user, profile }
    }

    pub fn id(&self) -> i64 {
        self.user.id
    }

    pub fn is_staff(&self) -> bool {
        self.user.is_staff || matches!(self.profile, Profile::Admin)
    }

    pub fn student_profile(&self) -> Option<&StudentProfile> {
        match &self.profile {
            Profile::Student(p) => Some(p),
            _ => None,
        }
    }

    pub fn enterprise_profile(&self) -> Option<&EnterpriseProfile> {
        match &self.profile {
            Profile::Enterprise(p) => Some(p),
            _ => None,
        }
    }

    pub fn require_staff(&self) -> Result<()> {
        if self.is_staff() {
            Ok(())
        } else {
            Err(Error::Forbidden("Administrator access required".into()))
        }
    }

    /// Staff may act on any company's resources; an enterprise only on its own.
    pub fn can_manage_company(&self, company_id: i64) -> bool {
        self.is_staff()
            || self
                .enterprise_profile()
                .map(|p| p.id == company_id)
                .unwrap_or(false)
    }

    pub fn ensure_can_manage_company(&self, company_id: i64) -> Result<()> {
        if self.can_manage_company(company_id) {
            return Ok(());
        }
        if self.enterprise_profile().is_some() {
            Err(Error::Forbidden(
                "You can only manage your own company's jobs and applications".into(),
            ))
        } else {
            Err(Error::Forbidden("Permission denied".into()))
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::Utc;

    pub fn user(id: i64, user_type: UserType) -> User {
        User {
            id,
            phone: format!("1380000{:04}", id),
            email: None,
            password_hash: String::new(),
            user_type: user_type.as_str().to_string(),
            avatar: None,
            real_name: String::new(),
            gender: String::new(),
            birth_date: None,
            address: String::new(),
            is_active: true,
            is_staff: user_type == UserType::Admin,
            is_verified: false,
            last_login_ip: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn enterprise_profile(id: i64, user_id: i64) -> EnterpriseProfile {
        EnterpriseProfile {
            id,
            user_id,
            company_name: format!("Company {}", id),
            company_code: format!("C{}", id),
            industry: String::new(),
            company_size: String::new(),
            company_address: String::new(),
            company_website: String::new(),
            company_description: String::new(),
            business_license: None,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn student_profile(id: i64, user_id: i64) -> StudentProfile {
        StudentProfile {
            id,
            user_id,
            student_id: String::new(),
            school: String::new(),
            major: String::new(),
            grade: String::new(),
            graduation_date: None,
            gpa: None,
            resume: None,
            skills: serde_json::json!([]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn enterprise(user_id: i64, company_id: i64) -> Actor {
        Actor::new(
            user(user_id, UserType::Enterprise),
            Profile::Enterprise(enterprise_profile(company_id, user_id)),
        )
    }

    pub fn student(user_id: i64, profile_id: i64) -> Actor {
        Actor::new(
            user(user_id, UserType::Student),
            Profile::Student(student_profile(profile_id, user_id)),
        )
    }

    pub fn admin(user_id: i64) -> Actor {
        Actor::new(user(user_id, UserType::Admin), Profile::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn enterprise_manages_only_its_company() {
        let a = enterprise(1, 10);
        assert!(a.can_manage_company(10));
        assert!(!a.can_manage_company(11));
        assert!(matches!(
            a.ensure_can_manage_company(11),
            Err(Error::Forbidden(_))
        ));
    }

    #[test]
    fn staff_manages_every_company() {
        let a = admin(2);
        assert!(a.can_manage_company(10));
        assert!(a.require_staff().is_ok());
    }

    #[test]
    fn students_cannot_manage_companies_or_admin() {
        let s = student(3, 30);
        assert!(!s.can_manage_company(10));
        assert!(s.require_staff().is_err());
        assert_eq!(s.student_profile().map(|p| p.id), Some(30));
    }
}
