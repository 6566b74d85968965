//! 全栈集成测试
//!
//! 按主程序的组装方式把账本路由与 AVS 路由挂到同一个 HTTP 服务器，
//! 外加一个替身消息平台，从锁定资金一路驱动到取回成功。

use async_trait::async_trait;
use avs::{LedgerView, LockedFunds, SessionClaims, SessionValidator};
use axum::{Router, response::Json, routing::get};
use ed25519_dalek::SigningKey;
use ledger::{CommitmentLedger, LedgerState, ManualClock, TokenRegistry, create_ledger_router};
use pledge_common::{
    Address, AssertionPayload, AvsConfig, CourierConfig, DeploymentConfig, LoginAssertion,
    MintingVoucher, Secrets, VoucherValidator,
};
use rand::rngs::OsRng;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const COMMUNITY_ID: &str = "1036528281287131186";
const CHANNEL_ID: &str = "1036528281735934052";
const USER_ID: &str = "184984859";
const DOMAIN: &str = "example.com";
const CHAIN_ID: &str = "goerli";
const TOKEN_CONTRACT: &str = "0xA9b89BE286062A7aa2a6AD0f67DA07A6B573d682";

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

struct VaultBridge(Arc<CommitmentLedger>);

#[async_trait]
impl LedgerView for VaultBridge {
    async fn locked_funds(&self, owner: &Address) -> Option<LockedFunds> {
        self.0.locked_funds(owner).await.map(|r| LockedFunds {
            amount: r.amount,
            duration_secs: r.duration_secs,
            locked_at: r.locked_at,
        })
    }
}

async fn start_platform() -> String {
    async fn channels() -> Json<Value> {
        Json(json!([{ "id": CHANNEL_ID, "name": "daily-checkins" }]))
    }

    async fn messages() -> Json<Value> {
        // 平台最新在前；两次打卡相隔 30000 秒（> 8 小时）
        Json(json!([
            {
                "id": "2",
                "author": { "id": USER_ID, "username": "tester" },
                "timestamp": "2022-10-31T06:34:14.130000+00:00",
            },
            {
                "id": "1",
                "author": { "id": USER_ID, "username": "tester" },
                "timestamp": "2022-10-30T22:14:14.130000+00:00",
            },
        ]))
    }

    let router = Router::new()
        .route("/guilds/{guild_id}/channels", get(channels))
        .route("/channels/{channel_id}/messages", get(messages));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind platform");
    let addr = listener.local_addr().expect("platform addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("platform error");
    });
    format!("http://{addr}")
}

struct Stack {
    base_url: String,
    clock: Arc<ManualClock>,
    session_key: Vec<u8>,
}

async fn start_stack() -> Stack {
    let platform_endpoint = start_platform().await;

    let issuer_key = SigningKey::generate(&mut OsRng);
    let secrets = Secrets {
        signing_seed: issuer_key.to_bytes(),
        bot_token: "test-bot-token".to_string(),
        session_key: b"0123456789abcdef0123456789abcdef".to_vec(),
    };
    let deployment = DeploymentConfig {
        chain_id: CHAIN_ID.to_string(),
        token_contract: TOKEN_CONTRACT.to_string(),
        ledger_contract: String::new(),
    };
    let avs_config = AvsConfig {
        enabled: true,
        verification_domain: DOMAIN.to_string(),
        community_id: COMMUNITY_ID.to_string(),
        channel_id: CHANNEL_ID.to_string(),
        artwork_uri: "ipfs://QmYcmckp7GGXN1A2iTc32VPsT1WdFQ4m7tYzKghBAomE81".to_string(),
        courier: CourierConfig {
            endpoint: platform_endpoint,
            timeout_seconds: 5,
        },
    };

    // 与主程序一致：注册表校验公钥从签发种子派生
    let validator = VoucherValidator::new(
        issuer_key.verifying_key(),
        CHAIN_ID.to_string(),
        TOKEN_CONTRACT.to_string(),
    );
    let registry = Arc::new(TokenRegistry::new(validator));
    let clock = ManualClock::starting_at(1_700_000_000);
    let vault = Arc::new(CommitmentLedger::new(registry.clone(), clock.clone()));

    let avs_router = avs::create_avs_router(
        &avs_config,
        &deployment,
        &secrets,
        Arc::new(VaultBridge(vault.clone())),
    )
    .expect("create avs router");
    let ledger_router = create_ledger_router(LedgerState::new(vault, registry));

    let app = Router::new()
        .nest("/ledger", ledger_router)
        .nest("/avs", avs_router);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stack");
    let addr = listener.local_addr().expect("stack addr");
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("stack error");
    });

    Stack {
        base_url: format!("http://{addr}"),
        clock,
        session_key: secrets.session_key.clone(),
    }
}

impl Stack {
    fn session_token(&self) -> String {
        SessionValidator::new(self.session_key.clone())
            .issue(&SessionClaims {
                user_id: USER_ID.to_string(),
                display_name: "tester".to_string(),
                expires_at: now_unix() + 600,
            })
            .unwrap()
    }
}

fn login_payload(wallet: &SigningKey) -> LoginAssertion {
    let now = now_unix();
    LoginAssertion::sign(
        AssertionPayload {
            domain: DOMAIN.to_string(),
            address: Address::from_public_key(&wallet.verifying_key()),
            issued_at: now - 5,
            expires_at: now + 300,
            nonce: "deadbeef".to_string(),
        },
        wallet,
    )
    .unwrap()
}

#[tokio::test]
async fn test_full_commitment_journey() {
    let stack = start_stack().await;
    let client = reqwest::Client::new();
    let wallet = SigningKey::generate(&mut OsRng);
    let address = Address::from_public_key(&wallet.verifying_key());

    // 1. 锁定 1000 单位，承诺 2 天
    let response = client
        .post(format!("{}/ledger/lock", stack.base_url))
        .json(&json!({
            "address": address,
            "amount": 1000u64,
            "duration_secs": 172_800u64,
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // 2. 打卡达标，请求铸造凭证
    let response = client
        .post(format!("{}/avs/withdraw", stack.base_url))
        .header("x-pledge-session", stack.session_token())
        .json(&json!({ "login_payload": login_payload(&wallet) }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let voucher: MintingVoucher = serde_json::from_value(body["signature"].clone()).unwrap();
    assert_eq!(
        voucher.metadata.description,
        "For committing to 2 days of accountability"
    );

    // 3. 铸造纪念代币
    let response = client
        .post(format!("{}/ledger/mint", stack.base_url))
        .json(&json!({ "voucher": voucher }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    // 4. 时间锁未到期，取回被拒
    let response = client
        .post(format!("{}/ledger/withdraw", stack.base_url))
        .json(&json!({ "address": address }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "You cannot withdraw yet.");

    // 5. 两天过去，取回成功，记录归零
    stack.clock.advance(172_800);
    let response = client
        .post(format!("{}/ledger/withdraw", stack.base_url))
        .json(&json!({ "address": address }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["amount"], 1000);

    let funds: Value = client
        .get(format!("{}/ledger/funds/{}", stack.base_url, address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(funds["amount"], 0);
}

#[tokio::test]
async fn test_voucher_from_another_deployment_is_rejected() {
    let stack = start_stack().await;
    let client = reqwest::Client::new();
    let wallet = SigningKey::generate(&mut OsRng);
    let address = Address::from_public_key(&wallet.verifying_key());

    client
        .post(format!("{}/ledger/lock", stack.base_url))
        .json(&json!({
            "address": address,
            "amount": 1000u64,
            "duration_secs": 172_800u64,
        }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/avs/withdraw", stack.base_url))
        .header("x-pledge-session", stack.session_token())
        .json(&json!({ "login_payload": login_payload(&wallet) }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    let mut voucher: MintingVoucher = serde_json::from_value(body["signature"].clone()).unwrap();

    // 篡改部署绑定后，注册表必须拒绝
    voucher.chain_id = "mainnet".to_string();
    let response = client
        .post(format!("{}/ledger/mint", stack.base_url))
        .json(&json!({ "voucher": voucher }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}
