//! 密码哈希工具模块
//!
//! 使用 Argon2id 算法对管理员密码和 admin key 的 secret 部分进行哈希和验证。
//! 输入在哈希前会追加一个应用级静态盐值（`credentials.salt`）。

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// 密码哈希错误
#[derive(Debug)]
pub enum PasswordError {
    HashError(String),
    VerifyError(String),
    ParamsError(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HashError(msg) => write!(f, "Password hash error: {}", msg),
            Self::VerifyError(msg) => write!(f, "Password verify error: {}", msg),
            Self::ParamsError(msg) => write!(f, "Invalid hash parameters: {}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Argon2 work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Salted Argon2id hasher with a configured work factor.
#[derive(Clone)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
    static_salt: String,
}

impl SecretHasher {
    pub fn new(params: HashParams, static_salt: impl Into<String>) -> Result<Self, PasswordError> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| PasswordError::ParamsError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            static_salt: static_salt.into(),
        })
    }

    /// 使用系统随机源生成 salt 并哈希
    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hash_with_salt(secret, &salt)
    }

    /// 使用调用方提供的 salt 字节哈希（由 admin key 生成器自己的随机源产生）
    pub fn hash_with_salt_bytes(&self, secret: &str, salt: &[u8]) -> Result<String, PasswordError> {
        let salt =
            SaltString::encode_b64(salt).map_err(|e| PasswordError::HashError(e.to_string()))?;
        self.hash_with_salt(secret, &salt)
    }

    fn hash_with_salt(&self, secret: &str, salt: &SaltString) -> Result<String, PasswordError> {
        let salted = self.salted(secret);
        self.argon2
            .hash_password(salted.as_bytes(), salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// 验证 secret 是否匹配哈希
    ///
    /// `Ok(false)` 表示不匹配；哈希串本身无法解析等问题返回 `Err`。
    pub fn verify(&self, secret: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::VerifyError(e.to_string()))?;

        let salted = self.salted(secret);
        match self.argon2.verify_password(salted.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(e.to_string())),
        }
    }

    fn salted(&self, secret: &str) -> String {
        let mut salted = String::with_capacity(secret.len() + self.static_salt.len());
        salted.push_str(secret);
        salted.push_str(&self.static_salt);
        salted
    }
}

/// 检测字符串是否是 Argon2 哈希格式
pub fn is_argon2_hash(s: &str) -> bool {
    s.starts_with("$argon2")
}
