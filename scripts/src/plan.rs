//! Ordered, dependency-threaded deployment plans

use alloy_primitives::Address;
use tracing::info;

use crate::{
    deployer::ContractDeployer,
    errors::ScriptError,
    types::{ConstructorArgs, DeployedContract, StakingContract, StakingDeployment},
};

/// Computes a step's constructor arguments from the deployments made so far
pub type ArgsFn = fn(&PlanContext) -> Result<ConstructorArgs, ScriptError>;

/// A single step of a deployment plan
#[derive(Clone, Copy)]
pub struct ContractSpec {
    /// The contract deployed by this step
    pub contract: StakingContract,
    /// Computes the contract's constructor arguments
    pub constructor_args: ArgsFn,
}

/// The state visible to a step while its constructor arguments are computed
#[derive(Debug, Clone)]
pub struct PlanContext {
    /// The address signing the deployments
    deployer: Address,
    /// The contracts deployed by earlier steps, in order
    deployed: Vec<DeployedContract>,
}

impl PlanContext {
    /// Create a context for a plan signed by `deployer`
    pub fn new(deployer: Address) -> Self {
        Self {
            deployer,
            deployed: Vec::new(),
        }
    }

    /// The address signing the deployments
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// The address of a contract deployed by an earlier step
    pub fn address_of(&self, contract: StakingContract) -> Result<Address, ScriptError> {
        self.deployed
            .iter()
            .find(|d| d.contract == contract)
            .map(|d| d.address)
            .ok_or_else(|| {
                ScriptError::PlanOrdering(format!("`{contract}` has not been deployed yet"))
            })
    }
}

/// An ordered sequence of contract deployments
#[derive(Clone)]
pub struct DeploymentPlan {
    /// The steps, executed first to last
    steps: Vec<ContractSpec>,
}

impl DeploymentPlan {
    /// Create a plan out of the given steps
    pub fn new(steps: Vec<ContractSpec>) -> Self {
        Self { steps }
    }

    /// The reward token, then the staking token, then the staking controller
    /// wired to both tokens and administered by the deployer
    pub fn staking_suite() -> Self {
        Self::new(vec![
            ContractSpec {
                contract: StakingContract::RewardToken,
                constructor_args: |_| Ok(ConstructorArgs::token()),
            },
            ContractSpec {
                contract: StakingContract::StakingToken,
                constructor_args: |_| Ok(ConstructorArgs::token()),
            },
            ContractSpec {
                contract: StakingContract::StakingController,
                constructor_args: |ctx| {
                    Ok(ConstructorArgs::controller(
                        ctx.address_of(StakingContract::StakingToken)?,
                        ctx.address_of(StakingContract::RewardToken)?,
                        ctx.deployer(),
                    ))
                },
            },
        ])
    }

    /// The plan's steps
    pub fn steps(&self) -> &[ContractSpec] {
        &self.steps
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// `on_deployed` is invoked after each confirmed deployment, before the
    /// next step starts. Contracts deployed before a failure are left in place.
    pub async fn execute<D, F>(
        &self,
        deployer: &D,
        deployer_address: Address,
        mut on_deployed: F,
    ) -> Result<Vec<DeployedContract>, ScriptError>
    where
        D: ContractDeployer,
        F: FnMut(&DeployedContract) -> Result<(), ScriptError>,
    {
        let mut ctx = PlanContext::new(deployer_address);

        for (i, step) in self.steps.iter().enumerate() {
            let args = (step.constructor_args)(&ctx)?;
            info!(
                "step {}/{}: deploying `{}`",
                i + 1,
                self.steps.len(),
                step.contract
            );

            let address = deployer.deploy(step.contract, &args).await?;
            let deployed = DeployedContract {
                contract: step.contract,
                address,
            };

            on_deployed(&deployed)?;
            ctx.deployed.push(deployed);
        }

        Ok(ctx.deployed)
    }
}

impl StakingDeployment {
    /// Collect the addresses of a fully executed staking suite plan
    pub fn from_deployed(
        deployer: Address,
        deployed: &[DeployedContract],
    ) -> Result<Self, ScriptError> {
        let mut ctx = PlanContext::new(deployer);
        ctx.deployed.extend_from_slice(deployed);

        Ok(Self {
            deployer,
            reward_token: ctx.address_of(StakingContract::RewardToken)?,
            staking_token: ctx.address_of(StakingContract::StakingToken)?,
            controller: ctx.address_of(StakingContract::StakingController)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use alloy_primitives::U256;

    use super::*;
    use crate::types::initial_supply;

    /// Records every deployment and hands out sequential addresses
    #[derive(Default)]
    struct MockDeployer {
        /// The deployments requested so far
        calls: Mutex<Vec<(StakingContract, ConstructorArgs)>>,
        /// The zero-based call index to fail at, if any
        fail_at: Option<usize>,
    }

    impl ContractDeployer for MockDeployer {
        async fn deploy(
            &self,
            contract: StakingContract,
            args: &ConstructorArgs,
        ) -> Result<Address, ScriptError> {
            let mut calls = self.calls.lock().unwrap();
            if self.fail_at == Some(calls.len()) {
                return Err(ScriptError::ContractDeployment("reverted".to_string()));
            }

            calls.push((contract, args.clone()));
            Ok(Address::with_last_byte(calls.len() as u8))
        }
    }

    fn signer() -> Address {
        Address::repeat_byte(0xaa)
    }

    #[tokio::test]
    async fn test_staking_suite_order_and_args() {
        let deployer = MockDeployer::default();
        let deployed = DeploymentPlan::staking_suite()
            .execute(&deployer, signer(), |_| Ok(()))
            .await
            .unwrap();

        let reward_token = Address::with_last_byte(1);
        let staking_token = Address::with_last_byte(2);
        let calls = deployer.calls.into_inner().unwrap();
        assert_eq!(
            calls,
            vec![
                (
                    StakingContract::RewardToken,
                    ConstructorArgs::Token {
                        initial_supply: initial_supply()
                    }
                ),
                (
                    StakingContract::StakingToken,
                    ConstructorArgs::Token {
                        initial_supply: initial_supply()
                    }
                ),
                (
                    StakingContract::StakingController,
                    ConstructorArgs::Controller {
                        reward_rate_per_block: U256::from(1000u64),
                        staking_token,
                        reward_token,
                        admin: signer(),
                    }
                ),
            ]
        );

        let suite = StakingDeployment::from_deployed(signer(), &deployed).unwrap();
        assert_eq!(suite.reward_token, reward_token);
        assert_eq!(suite.staking_token, staking_token);
        assert_eq!(suite.controller, Address::with_last_byte(3));
    }

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let deployer = MockDeployer {
            fail_at: Some(1),
            ..Default::default()
        };

        let mut reported = Vec::new();
        let res = DeploymentPlan::staking_suite()
            .execute(&deployer, signer(), |d| {
                reported.push(*d);
                Ok(())
            })
            .await;

        assert!(matches!(res, Err(ScriptError::ContractDeployment(_))));
        assert_eq!(deployer.calls.lock().unwrap().len(), 1);
        assert_eq!(
            reported,
            vec![DeployedContract {
                contract: StakingContract::RewardToken,
                address: Address::with_last_byte(1),
            }]
        );
    }

    #[tokio::test]
    async fn test_callback_error_aborts_plan() {
        let deployer = MockDeployer::default();
        let res = DeploymentPlan::staking_suite()
            .execute(&deployer, signer(), |_| {
                Err(ScriptError::WriteDeployments("read-only".to_string()))
            })
            .await;

        assert!(matches!(res, Err(ScriptError::WriteDeployments(_))));
        assert_eq!(deployer.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_order_plan() {
        let plan = DeploymentPlan::new(vec![DeploymentPlan::staking_suite().steps()[2]]);
        let deployer = MockDeployer::default();

        let res = plan.execute(&deployer, signer(), |_| Ok(())).await;

        assert!(matches!(res, Err(ScriptError::PlanOrdering(_))));
        assert!(deployer.calls.lock().unwrap().is_empty());
    }
}
