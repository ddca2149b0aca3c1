use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::{
    AttendanceService, BookingService, CouponService, HttpPaymentGateway, NotificationService,
    PaymentGateway, PaymentService, PointsService,
};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 每个服务在构造时注入自己的依赖 (连接池、通知分发、支付网关)，
/// 没有任何进程级的隐式全局状态。
///
/// # 服务组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | pool | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
/// | bookings | 预约容量管理 |
/// | points | 积分账本 |
/// | coupons | 优惠券生命周期 |
/// | attendance | 出席连续打卡 |
/// | payments | 支付确认/取消 |
/// | notifier | 推送通知分发 (尽力而为) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub bookings: BookingService,
    pub points: PointsService,
    pub coupons: CouponService,
    pub attendance: AttendanceService,
    pub payments: PaymentService,
    pub notifier: NotificationService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database/gather.db) 和迁移
    /// 3. 各服务 (注入连接池、通知分发、支付网关)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("gather.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let gateway: Arc<dyn PaymentGateway> = Arc::new(HttpPaymentGateway::new(
            config.payment_gateway_url.clone(),
            config.payment_gateway_secret.clone(),
        ));

        Self::from_parts(config.clone(), db_service.pool, gateway)
    }

    /// 从已构建的依赖组装状态 (测试与工具共用)
    pub fn from_parts(
        config: Config,
        pool: SqlitePool,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let notifier = NotificationService::new(config.notify_endpoint.clone());

        let points = PointsService::new(pool.clone());
        let bookings = BookingService::new(pool.clone(), notifier.clone());
        let coupons = CouponService::new(pool.clone());
        let attendance = AttendanceService::new(pool.clone(), points.clone());
        let payments = PaymentService::new(pool.clone(), gateway);

        Self {
            config,
            pool,
            jwt_service,
            bookings,
            points,
            coupons,
            attendance,
            payments,
            notifier,
        }
    }
}
