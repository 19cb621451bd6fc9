//! 表单校验与表单数据转换
//!
//! 纯函数，不依赖 signal；组件只负责把输入收集成这里的结构体。

use chrono::NaiveDate;
use clubhouse_shared::protocol::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use clubhouse_shared::{MemberType, User};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_PROFILE_NAME_LEN: usize = 2;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 校验结果，错误信息直接展示给用户
pub type Validation<T> = Result<T, &'static str>;

pub fn validate_email(email: &str) -> Validation<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Please enter your email");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Please enter a valid email address");
    };
    let domain_ok = domain
        .rsplit_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) || !domain_ok {
        return Err("Please enter a valid email address");
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Validation<()> {
    if password.is_empty() {
        return Err("Please enter your password");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// 解析 `YYYY-MM-DD`；空字符串视为未填写
pub fn parse_date(value: &str) -> Validation<Option<NaiveDate>> {
    match non_blank(value) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(&v, DATE_FORMAT)
            .map(Some)
            .map_err(|_| "Date of birth must be in YYYY-MM-DD format"),
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

impl SignInInput {
    pub fn into_request(self) -> Validation<LoginRequest> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password,
        })
    }
}

/// 注册表单
///
/// 教练额外填写联系方式与球队，球员额外填写位置与水平；
/// 其余角色忽略这些字段。
#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub member_type: MemberType,
    pub phone: String,
    pub date_of_birth: String,
    pub contact_info: String,
    pub team_name: String,
    pub position: String,
    pub skill_level: String,
}

impl Default for SignUpInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            member_type: MemberType::Member,
            phone: String::new(),
            date_of_birth: String::new(),
            contact_info: String::new(),
            team_name: String::new(),
            position: String::new(),
            skill_level: String::new(),
        }
    }
}

impl SignUpInput {
    pub fn into_request(self) -> Validation<RegisterRequest> {
        let name = non_blank(&self.name).ok_or("Please enter your name")?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err("Passwords do not match");
        }
        let date_of_birth = parse_date(&self.date_of_birth)?;

        let is_coach = self.member_type == MemberType::Coach;
        let is_player = self.member_type == MemberType::Player;

        Ok(RegisterRequest {
            name,
            email: self.email.trim().to_string(),
            password: self.password,
            member_type: self.member_type,
            phone: non_blank(&self.phone),
            contact_info: non_blank(&self.contact_info).filter(|_| is_coach),
            date_of_birth,
            position: non_blank(&self.position).filter(|_| is_player),
            skill_level: non_blank(&self.skill_level).filter(|_| is_player),
            team_name: non_blank(&self.team_name).filter(|_| is_coach),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub consent_form_url: String,
}

impl ProfileInput {
    /// 用当前用户资料预填表单
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            consent_form_url: user.consent_form_url.clone().unwrap_or_default(),
        }
    }

    pub fn into_request(self, id: u64) -> Validation<UpdateProfileRequest> {
        let name = self.name.trim().to_string();
        if name.chars().count() < MIN_PROFILE_NAME_LEN {
            return Err("Name must be at least 2 characters");
        }
        validate_email(&self.email)?;
        Ok(UpdateProfileRequest {
            id,
            name,
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            consent_form_url: self.consent_form_url.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("  coach.one@club.co.uk ").is_ok());

        for bad in ["", "ax.com", "@x.com", "a@", "a@x", "a@.com", "a@x.", "a@b@x.com", "a b@x.com"] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_password_length() {
        assert_eq!(validate_password(""), Err("Please enter your password"));
        assert!(validate_password("12345").is_err());
        assert!(validate_password("secret").is_ok());
    }

    #[test]
    fn test_sign_in_trims_email() {
        let req = SignInInput {
            email: " a@x.com ".to_string(),
            password: "secret1".to_string(),
        }
        .into_request()
        .unwrap();
        assert_eq!(req.email, "a@x.com");
        assert_eq!(req.password, "secret1");
    }

    fn sign_up() -> SignUpInput {
        SignUpInput {
            name: "Jordan".to_string(),
            email: "jordan@club.org".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sign_up_requires_name_and_matching_passwords() {
        let mut input = sign_up();
        input.name = "   ".to_string();
        assert_eq!(input.into_request().unwrap_err(), "Please enter your name");

        let mut input = sign_up();
        input.confirm_password = "secret2".to_string();
        assert_eq!(input.into_request().unwrap_err(), "Passwords do not match");
    }

    #[test]
    fn test_sign_up_parses_date_of_birth() {
        let mut input = sign_up();
        input.date_of_birth = "2001-04-09".to_string();
        let req = input.into_request().unwrap();
        assert_eq!(req.date_of_birth, NaiveDate::from_ymd_opt(2001, 4, 9));

        let mut input = sign_up();
        input.date_of_birth = "09/04/2001".to_string();
        assert!(input.into_request().is_err());
    }

    #[test]
    fn test_sign_up_keeps_role_specific_fields_only() {
        let mut input = sign_up();
        input.member_type = MemberType::Coach;
        input.team_name = "U12 Falcons".to_string();
        input.position = "Goalkeeper".to_string();
        let req = input.into_request().unwrap();
        assert_eq!(req.team_name.as_deref(), Some("U12 Falcons"));
        assert_eq!(req.position, None);

        let mut input = sign_up();
        input.member_type = MemberType::Player;
        input.position = "Goalkeeper".to_string();
        input.team_name = "U12 Falcons".to_string();
        let req = input.into_request().unwrap();
        assert_eq!(req.position.as_deref(), Some("Goalkeeper"));
        assert_eq!(req.team_name, None);
        assert_eq!(req.phone, None);
    }

    #[test]
    fn test_profile_name_minimum() {
        let input = ProfileInput {
            name: "J".to_string(),
            email: "j@club.org".to_string(),
            ..Default::default()
        };
        assert_eq!(input.into_request(3).unwrap_err(), "Name must be at least 2 characters");

        let input = ProfileInput {
            name: "Jo".to_string(),
            email: "j@club.org".to_string(),
            phone: " 555 ".to_string(),
            ..Default::default()
        };
        let req = input.into_request(3).unwrap();
        assert_eq!(req.id, 3);
        assert_eq!(req.phone, "555");
    }

    #[test]
    fn test_profile_prefilled_from_user() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Ana", "email": "ana@club.org", "member_type": "chairman", "phone": "123"
        }))
        .unwrap();
        let input = ProfileInput::from_user(&user);
        assert_eq!(input.phone, "123");
        assert_eq!(input.consent_form_url, "");
    }
}
