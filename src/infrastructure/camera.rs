//! 摄像头 - 基础设施层
//!
//! 扫码开始时获取摄像头，解码成功、出错或页面销毁时都必须释放。

use thiserror::Error;
use tracing::debug;

/// 摄像头错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// 当前帧中没有找到二维码，扫码过程中的正常情况
    #[error("NotFoundError")]
    NotFound,

    /// 无法访问摄像头（权限、设备占用等）
    #[error("camera access failed: {0}")]
    AccessFailed(String),
}

/// 摄像头能力
pub trait Camera {
    fn start(&mut self) -> Result<(), CameraError>;

    fn stop(&mut self);
}

/// 摄像头占用守卫
///
/// 持有期间摄像头处于开启状态，`release` 或 drop 时关闭
pub struct CameraGuard<C: Camera> {
    camera: C,
    acquired: bool,
}

impl<C: Camera> CameraGuard<C> {
    /// 包装摄像头，此时尚未开启
    pub fn new(camera: C) -> Self {
        Self {
            camera,
            acquired: false,
        }
    }

    /// 开启摄像头，已开启时什么也不做
    pub fn acquire(&mut self) -> Result<(), CameraError> {
        if !self.acquired {
            self.camera.start()?;
            self.acquired = true;
            debug!("📷 摄像头已开启");
        }
        Ok(())
    }

    /// 关闭摄像头，可重复调用
    pub fn release(&mut self) {
        if self.acquired {
            self.camera.stop();
            self.acquired = false;
            debug!("📷 摄像头已释放");
        }
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }
}

impl<C: Camera> Drop for CameraGuard<C> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeCamera {
        stops: Rc<Cell<usize>>,
        fail: bool,
    }

    impl Camera for FakeCamera {
        fn start(&mut self) -> Result<(), CameraError> {
            if self.fail {
                Err(CameraError::AccessFailed("permission denied".into()))
            } else {
                Ok(())
            }
        }

        fn stop(&mut self) {
            self.stops.set(self.stops.get() + 1);
        }
    }

    #[test]
    fn test_drop_releases_once() {
        let stops = Rc::new(Cell::new(0));
        {
            let mut guard = CameraGuard::new(FakeCamera {
                stops: stops.clone(),
                fail: false,
            });
            guard.acquire().unwrap();
            guard.release();
            guard.release();
        }
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_failed_start_is_not_released() {
        let stops = Rc::new(Cell::new(0));
        {
            let mut guard = CameraGuard::new(FakeCamera {
                stops: stops.clone(),
                fail: true,
            });
            assert!(guard.acquire().is_err());
            assert!(!guard.is_acquired());
        }
        assert_eq!(stops.get(), 0);
    }
}
